// src/followers/tests/mod.rs

mod handlers_tests;
