mod capability_tests;
mod lib_tests;
