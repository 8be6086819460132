//! Capture engine
//!
//! One worker thread per selected interface, each owning its datalink
//! channel and exporter. Workers poll a shared shutdown flag between reads;
//! the datalink read timeout keeps that poll honest on quiet interfaces.
//! Per-packet failures never stop a worker, and a worker that cannot open
//! its channel reports the error and leaves the others running.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pnet::datalink::{self, Channel, NetworkInterface};

use crate::config::Config;
use crate::error::{ArrowError, ArrowResult};
use crate::events::{Event, Reporter};
use crate::export::{self, Exporter};
use crate::filter::CaptureFilter;
use crate::{flow, frame, iface, vxlan};

/// How long a blocked read waits before re-checking the shutdown flag.
const READ_TIMEOUT_MS: u64 = 500;

/// Run the sensor until the shutdown flag is set.
///
/// Fails fast on startup problems: unresolvable collector, bad control
/// network, or zero capturable interfaces.
pub fn run(config: &Config, reporter: &Reporter, shutdown: Arc<AtomicBool>) -> ArrowResult<()> {
    let collector = export::resolve_collector(&config.dest_host, config.dest_port)?;
    let control = config.control_network()?;

    let surveyed = iface::survey(&control);
    let mut selected = Vec::new();
    for (interface, verdict) in surveyed {
        reporter.emit(&Event::InterfaceVerdict {
            name: interface.name.clone(),
            addresses: interface.ips.iter().map(|n| n.to_string()).collect(),
            verdict,
        });
        if verdict.is_capture() {
            selected.push(interface);
        }
    }
    if selected.is_empty() {
        return Err(ArrowError::NoUsableInterfaces);
    }

    reporter.emit(&Event::Started {
        collector: collector.to_string(),
        vni: config.vni,
        interfaces: selected.len(),
    });

    let mut workers = Vec::with_capacity(selected.len());
    for interface in selected {
        let worker_reporter = reporter.clone();
        let worker_filter = CaptureFilter::new(collector, config.filter.clone());
        let worker_shutdown = Arc::clone(&shutdown);
        let vni = config.vni;
        workers.push(thread::spawn(move || {
            capture_on(
                interface,
                vni,
                worker_filter,
                Exporter::new(collector),
                worker_reporter,
                worker_shutdown,
            );
        }));
    }

    for worker in workers {
        // A panicking worker already wrote its message to stderr.
        let _ = worker.join();
    }

    reporter.emit(&Event::Shutdown);
    Ok(())
}

/// Capture loop for a single interface.
fn capture_on(
    interface: NetworkInterface,
    vni: u32,
    filter: CaptureFilter,
    mut exporter: Exporter,
    reporter: Reporter,
    shutdown: Arc<AtomicBool>,
) {
    let mut config = datalink::Config::default();
    config.read_timeout = Some(Duration::from_millis(READ_TIMEOUT_MS));
    config.promiscuous = true;

    let mut rx = match datalink::channel(&interface, config) {
        Ok(Channel::Ethernet(_tx, rx)) => rx,
        Ok(_) => {
            reporter.emit(&Event::CaptureError {
                interface: interface.name.clone(),
                message: "unsupported channel type".to_string(),
            });
            return;
        }
        Err(e) => {
            reporter.emit(&Event::CaptureError {
                interface: interface.name.clone(),
                message: e.to_string(),
            });
            return;
        }
    };

    reporter.emit(&Event::WorkerStarted {
        interface: interface.name.clone(),
    });

    while !shutdown.load(Ordering::Relaxed) {
        let raw = match rx.next() {
            Ok(raw) => raw,
            Err(ref e) if is_transient(e) => continue,
            Err(e) => {
                reporter.emit(&Event::CaptureError {
                    interface: interface.name.clone(),
                    message: e.to_string(),
                });
                break;
            }
        };

        let summary = frame::parse(raw);
        if !filter.decide(summary.as_ref()) {
            continue;
        }

        let src_port = flow::source_port(summary.as_ref());
        let packet = vxlan::encapsulate(vni, raw);
        match exporter.send(src_port, &packet) {
            Ok(bytes) => reporter.emit(&Event::PacketExported {
                interface: interface.name.clone(),
                bytes,
                src_port,
            }),
            Err(e) => reporter.emit(&Event::ExportError {
                interface: interface.name.clone(),
                message: e.to_string(),
            }),
        }
    }

    reporter.emit(&Event::WorkerStopped {
        interface: interface.name,
    });
}

/// Read errors that mean "nothing arrived yet", not "the channel is dead".
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_transient() {
        for kind in [
            io::ErrorKind::TimedOut,
            io::ErrorKind::WouldBlock,
            io::ErrorKind::Interrupted,
        ] {
            assert!(is_transient(&io::Error::from(kind)));
        }
    }

    #[test]
    fn test_real_failures_are_not_transient() {
        assert!(!is_transient(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::BrokenPipe)));
    }
}
