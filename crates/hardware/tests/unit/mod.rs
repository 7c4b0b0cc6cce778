//! Unit tests, laid out like the library's module tree.
