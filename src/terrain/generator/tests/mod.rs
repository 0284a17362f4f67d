mod heightfield_tests;
