//! Integration tests: drive the appship binary against temporary git repositories

mod helpers;
mod test_changelog;
mod test_check;
mod test_pipeline;
