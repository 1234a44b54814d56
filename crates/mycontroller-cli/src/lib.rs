//! Command-line front end for MyController server settings.
//!
//! `mcsettings` drives the same settings controllers as the web screens:
//! every change loads the group from the server, edits it and saves the
//! complete record back.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `show <screen>` | Print one settings screen (`system`, `units`, `notifications`, `mysensors`, `metrics`) |
//! | `set <group>` | Change fields of one settings group and save it |
//! | `config` | Manage the CLI configuration file |
//! | `completions` | Generate shell completions |
//!
//! # Output Formats
//!
//! - **Text** (default): Human-readable colored output
//! - **JSON**: The records as sent by the server, plus derived display values
//!
//! # Configuration
//!
//! The CLI stores configuration in `~/.config/mycontroller/config.toml` (or
//! platform equivalent); `--config` points at another file. The session
//! snapshot written after a controller save lands next to it as
//! `session.json` and is restored on the next run.
//!
//! # Environment Variables
//!
//! - `MC_SERVER_URL`: Server URL (overridden by `--server`)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! ```bash
//! mcsettings show system --server http://mc.local:8443
//! mcsettings set controller --alive-check-minutes 5 --language de_de
//! mcsettings set retention --raw-data 12h --one-day 30d
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod frontend;
pub mod style;

pub use mycontroller_core;
pub use mycontroller_types;
