//! Integration tests: full monitor cycles against scripted sources.

mod cycle;
mod mock_source;
