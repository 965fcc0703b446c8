mod master;
