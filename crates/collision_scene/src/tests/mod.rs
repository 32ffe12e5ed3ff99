//! Cross-module scenarios: scene import through to bytes on disk and back

mod end_to_end;
