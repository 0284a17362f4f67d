mod stitch_tests;
