//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter        | Implements     | Connects to                 |
//! |----------------|----------------|-----------------------------|
//! | `config_file`  | ConfigPort     | JSON file / defaults        |
//! | `console`      | OperatorPort   | stdin / stdout              |
//! | `log_sink`     | EventSink      | `log` → stdout              |
//! | `process`      | CommandRunner  | `std::process::Command`     |
//! | `rpi`          | Board          | Raspberry Pi GPIO (rppal)   |
//! | `sim`          | Board          | In-memory board + DUT model |
//! | `time`         | DelayNs        | `std::thread::sleep`        |

pub mod config_file;
pub mod console;
pub mod log_sink;
pub mod process;
#[cfg(feature = "rpi")]
pub mod rpi;
pub mod sim;
pub mod time;
