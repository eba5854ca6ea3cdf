//! appship: build, sign, notarize, package and publish macOS apps
//!
//! A run is two stages over one shared [`core::context::RunState`]:
//! validation checks every configured concern, then execution drives the
//! external tools (xcodebuild, codesign, notarytool, hdiutil, gh, git) in a
//! fixed order. See [`pipeline::Pipeline`].

pub mod changelog;
pub mod checks;
pub mod commands;
pub mod core;
pub mod logging;
pub mod pipeline;
pub mod steps;
