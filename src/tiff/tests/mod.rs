//! Unit tests for TIFF structure parsing and writing

mod reader_tests;
mod writer_tests;
