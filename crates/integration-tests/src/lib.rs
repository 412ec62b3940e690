//! End-to-end tests for the relay live under `tests/`
