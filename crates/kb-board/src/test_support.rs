//! Shared fixtures for kb-board unit tests.
