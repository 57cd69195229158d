//! Core types flowing through the ingestion pipeline.
//!
//! - [`Message`] is one finalized frame produced by the assembler
//! - [`DeviceKind`] discriminates sensor classes for decoder dispatch
//! - [`DecodedReading`] is the typed result of decoding an energy-meter message
//! - [`Decoded`] is the decoder's non-error outcome (reading or unknown device)

mod device_kind;
mod message;
mod reading;

pub use device_kind::DeviceKind;
pub use message::{Boundary, CAPTURE_TIME_FORMAT, Message, format_capture_time};
pub use reading::{Decoded, DecodedReading};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn capture_time_matches_asctime_layout() {
        let at = Local.with_ymd_and_hms(2026, 10, 9, 8, 5, 3).unwrap();
        // asctime pads the day of month with a space
        assert_eq!(format_capture_time(&at), "Fri Oct  9 08:05:03 2026");

        let at = Local.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(format_capture_time(&at), "Mon Oct 19 12:00:00 2026");
    }

    #[test]
    fn message_text_is_lossy() {
        let at = Local.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let msg = Message::new(vec![b'O', b'K', 0xFF], Boundary::Terminator, at);
        assert_eq!(msg.text(), "OK\u{FFFD}");
        assert_eq!(msg.len(), 3);
        assert!(!msg.is_empty());
    }

    #[test]
    fn energy_meter_payload_width() {
        assert_eq!(DeviceKind::EnergyMeter.payload_tokens(), 14);
        assert_eq!(DeviceKind::EnergyMeter.to_string(), "electricity energy meter");
    }
}
