//! Sensor event reporting
//!
//! Text output for operators, NDJSON for machine consumption (one JSON
//! object per line on stdout). Verbosity gates the chattier events: `-v`
//! adds interface verdicts and worker lifecycle, `-vv` adds a line per
//! exported packet.

use is_terminal::IsTerminal;

use crate::iface::Verdict;

/// Events emitted while the sensor runs.
#[derive(Debug, Clone)]
pub enum Event {
    Started {
        collector: String,
        vni: u32,
        interfaces: usize,
    },
    InterfaceVerdict {
        name: String,
        addresses: Vec<String>,
        verdict: Verdict,
    },
    WorkerStarted {
        interface: String,
    },
    WorkerStopped {
        interface: String,
    },
    CaptureError {
        interface: String,
        message: String,
    },
    ExportError {
        interface: String,
        message: String,
    },
    PacketExported {
        interface: String,
        bytes: usize,
        src_port: u16,
    },
    Shutdown,
}

impl Event {
    pub fn to_json(&self) -> String {
        let value = match self {
            Event::Started {
                collector,
                vni,
                interfaces,
            } => serde_json::json!({
                "event": "started",
                "collector": collector,
                "vni": vni,
                "interfaces": interfaces,
            }),
            Event::InterfaceVerdict {
                name,
                addresses,
                verdict,
            } => serde_json::json!({
                "event": "interface",
                "name": name,
                "addresses": addresses,
                "verdict": verdict.as_str(),
            }),
            Event::WorkerStarted { interface } => serde_json::json!({
                "event": "worker_started",
                "interface": interface,
            }),
            Event::WorkerStopped { interface } => serde_json::json!({
                "event": "worker_stopped",
                "interface": interface,
            }),
            Event::CaptureError { interface, message } => serde_json::json!({
                "event": "capture_error",
                "interface": interface,
                "message": message,
            }),
            Event::ExportError { interface, message } => serde_json::json!({
                "event": "export_error",
                "interface": interface,
                "message": message,
            }),
            Event::PacketExported {
                interface,
                bytes,
                src_port,
            } => serde_json::json!({
                "event": "packet",
                "interface": interface,
                "bytes": bytes,
                "src_port": src_port,
            }),
            Event::Shutdown => serde_json::json!({ "event": "shutdown" }),
        };
        value.to_string()
    }

    fn render_text(&self, icons: &Icons) -> String {
        match self {
            Event::Started {
                collector,
                vni,
                interfaces,
            } => format!(
                "{} mirroring to {} (vni {}) on {} interface(s)",
                icons.check, collector, vni, interfaces
            ),
            Event::InterfaceVerdict {
                name,
                addresses,
                verdict,
            } => {
                if addresses.is_empty() {
                    format!("{} {}: {}", icons.iface, name, verdict)
                } else {
                    format!("{} {} [{}]: {}", icons.iface, name, addresses.join(", "), verdict)
                }
            }
            Event::WorkerStarted { interface } => {
                format!("{} capturing on {}", icons.arrow, interface)
            }
            Event::WorkerStopped { interface } => {
                format!("{} stopped capturing on {}", icons.skip, interface)
            }
            Event::CaptureError { interface, message } => {
                format!("{} {}: {}", icons.cross, interface, message)
            }
            Event::ExportError { interface, message } => {
                format!("{} export failed on {}: {}", icons.cross, interface, message)
            }
            Event::PacketExported {
                interface,
                bytes,
                src_port,
            } => format!(
                "{} {} exported {} bytes from port {}",
                icons.arrow, interface, bytes, src_port
            ),
            Event::Shutdown => format!("{} shutting down", icons.check),
        }
    }

    fn is_error(&self) -> bool {
        matches!(self, Event::CaptureError { .. } | Event::ExportError { .. })
    }

    /// Minimum verbosity at which this event appears in text mode.
    fn min_verbosity(&self) -> u8 {
        match self {
            Event::Started { .. } | Event::Shutdown => 0,
            Event::CaptureError { .. } | Event::ExportError { .. } => 0,
            Event::InterfaceVerdict { .. }
            | Event::WorkerStarted { .. }
            | Event::WorkerStopped { .. } => 1,
            Event::PacketExported { .. } => 2,
        }
    }
}

/// Icons for text rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
    arrow: &'static str,
    skip: &'static str,
    iface: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            arrow: "→",
            skip: "○",
            iface: "·",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            arrow: "->",
            skip: "[ ]",
            iface: "-",
        }
    }
}

/// Success icon for standalone status lines outside the event stream,
/// honoring the same terminal gate as event rendering.
pub fn ok_icon() -> &'static str {
    if std::io::stdout().is_terminal() {
        Icons::unicode().check
    } else {
        Icons::ascii().check
    }
}

/// Destination and formatting for sensor events.
///
/// Cheap to clone; every capture worker carries its own copy.
#[derive(Debug, Clone)]
pub struct Reporter {
    json: bool,
    verbose: u8,
    unicode: bool,
}

impl Reporter {
    pub fn new(json: bool, verbose: u8) -> Self {
        Self {
            json,
            verbose,
            unicode: std::io::stdout().is_terminal(),
        }
    }

    pub fn emit(&self, event: &Event) {
        if self.json {
            // NDJSON consumers get every event on stdout; only the
            // per-packet firehose stays behind -vv.
            if matches!(event, Event::PacketExported { .. }) && self.verbose < 2 {
                return;
            }
            println!("{}", event.to_json());
            return;
        }
        if event.min_verbosity() > self.verbose {
            return;
        }
        let icons = if self.unicode {
            Icons::unicode()
        } else {
            Icons::ascii()
        };
        if event.is_error() {
            eprintln!("{}", event.render_text(&icons));
        } else {
            println!("{}", event.render_text(&icons));
        }
    }
}
