//! Score a single reading and print the monitor snapshot

use chrono::Utc;
use mindpulse::WellnessMonitor;

fn main() {
    let json = r#"{"heartRate": 96, "temperature": 36.8, "spo2": 97, "gsr": 640, "deviceId": "band-01"}"#;

    match mindpulse::score_reading_json(json.to_string()) {
        Ok(score) => println!("{score}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }

    let mut monitor = WellnessMonitor::new();
    match monitor.ingest_json(json, Utc::now()) {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(pretty) => println!("{pretty}"),
            Err(e) => eprintln!("Error: {e:?}"),
        },
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
