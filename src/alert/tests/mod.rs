mod core_test;
