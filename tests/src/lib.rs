//! Holds no code: the tests in `tests/` are generated by `build.rs`, one per file in
//! `test_files/`.
