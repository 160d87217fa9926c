//! AS7341 Host CLI
//!
//! This binary runs on your PC and provides an interactive shell to
//! drive an AS7341 spectral sensor attached to the RP2350 via USB.
//!
//! ## Usage
//!
//! ```bash
//! # List available serial ports
//! cargo run --features std --bin as7341_host -- --list-ports
//!
//! # Connect to device (auto-detects RP2350)
//! cargo run --features std --bin as7341_host
//!
//! # Connect to specific port
//! cargo run --features std --bin as7341_host -- --port COM3
//! ```
//!
//! ## Commands
//!
//! - `measure` - Full 10-band reading
//! - `group <F1F4|F5F8|FD>` - Raw ADC values of one SMUX group
//! - `flicker` - Detect mains flicker frequency
//! - `gain <code>` - Set gain code 0-10
//! - `gainx <factor>` - Set gain by factor (floored)
//! - `atime <atime> <astep>` - Set raw integration registers
//! - `itime <ms>` - Set integration time in ms
//! - `led <mA> [on|off]` - Set LED current
//! - `settings` - Show gain and integration settings
//! - `diag` - Show system diagnostics
//! - `help` - Show help
//! - `exit` - Exit shell

use std::io::{self, Write};
use std::time::Duration;

use as7341_rp::domain::{ChannelGroup, SpectralReading};
use as7341_rp::protocol::{SensorCommand, SensorResponse};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    // Parse arguments
    if args.contains(&"--list-ports".to_string()) {
        list_ports();
        return Ok(());
    }

    let port_name = if let Some(idx) = args.iter().position(|a| a == "--port") {
        args.get(idx + 1).cloned()
    } else {
        find_device_port()
    };

    let port_name = match port_name {
        Some(name) => name,
        None => {
            eprintln!("Error: No sensor device found");
            eprintln!("Use --list-ports to see available ports");
            eprintln!("Or specify port with --port <PORT>");
            return Err("No device found".into());
        }
    };

    // On Windows, COM ports >= 10 need the \\.\COMxx format
    #[cfg(target_os = "windows")]
    let port_name = if port_name.starts_with("COM") && !port_name.starts_with(r"\\") {
        format!(r"\\.\{}", port_name)
    } else {
        port_name
    };

    print!("Connecting to {}...", port_name);
    io::stdout().flush()?;

    // Two acquisition cycles plus SMUX settle can take well over two seconds
    let mut port = serialport::new(&port_name, 115200)
        .timeout(Duration::from_millis(5000))
        .flow_control(serialport::FlowControl::None)
        .open()?;

    println!(" opened!");

    // Set DTR (Data Terminal Ready) - some CDC devices wait for this
    port.write_data_terminal_ready(true)?;

    println!("Connected!");
    println!("Waiting for device ready...");

    // Wait for ready response (COBS-encoded, ends with 0x00)
    let mut ready = false;
    let mut rx_buf = vec![0u8; 1024];
    let mut rx_pos = 0;

    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(100));
        if let Ok(n) = port.read(&mut rx_buf[rx_pos..]) {
            if n > 0 {
                rx_pos += n;
                if rx_buf[..rx_pos].contains(&0x00) {
                    let frame = &mut rx_buf[..rx_pos];
                    if let Ok(SensorResponse::Ok) = postcard::from_bytes_cobs(frame) {
                        ready = true;
                        break;
                    }
                }
            }
        }
    }

    if !ready {
        println!("Warning: Did not receive ready signal from device");
        println!("Proceeding anyway...");
    } else {
        println!("Device ready!");
    }

    println!("\nAS7341 Sensor Shell");
    println!("Type 'help' for commands, 'exit' to quit\n");

    // Interactive shell
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            break;
        }

        if input == "help" {
            print_help();
            continue;
        }

        match parse_command(input) {
            Ok(cmd) => {
                if let Err(e) = execute_command(&mut port, cmd) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn list_ports() {
    println!("Available serial ports:");
    match serialport::available_ports() {
        Ok(ports) => {
            if ports.is_empty() {
                println!("  (none)");
            }
            for port in ports {
                print!("  {}", port.port_name);
                match &port.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        println!(" - USB (VID: 0x{:04x}, PID: 0x{:04x})", info.vid, info.pid);
                        if let Some(ref product) = info.product {
                            println!("      Product: {}", product);
                        }
                    }
                    other => println!(" - {}", port_type_name(other)),
                }
            }
        }
        Err(e) => {
            eprintln!("Error listing ports: {}", e);
        }
    }
}

fn port_type_name(port_type: &serialport::SerialPortType) -> &str {
    match port_type {
        serialport::SerialPortType::UsbPort(_) => "USB",
        serialport::SerialPortType::BluetoothPort => "Bluetooth",
        serialport::SerialPortType::PciPort => "PCI",
        serialport::SerialPortType::Unknown => "Unknown",
    }
}

fn find_device_port() -> Option<String> {
    let ports = serialport::available_ports().ok()?;

    ports.into_iter().find_map(|port| match &port.port_type {
        // Raspberry Pi vendor ID
        serialport::SerialPortType::UsbPort(info) if info.vid == 0x2e8a => Some(port.port_name),
        _ => None,
    })
}

fn parse_command(input: &str) -> Result<SensorCommand, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&name) = parts.first() else {
        return Err("Empty command".to_string());
    };

    match name {
        "measure" | "m" => Ok(SensorCommand::Measure),

        "group" => {
            let arg = parts.get(1).ok_or("Usage: group <F1F4|F5F8|FD>")?;
            let group = arg
                .parse::<ChannelGroup>()
                .map_err(|_| format!("Unknown channel group '{}'", arg))?;
            Ok(SensorCommand::MeasureGroup { group })
        }

        "flicker" | "fd" => Ok(SensorCommand::Flicker),

        "gain" => {
            let code = parse_arg::<u8>(&parts, 1, "Usage: gain <0-10>")?;
            if code > 10 {
                return Err("Gain code must be 0-10".to_string());
            }
            Ok(SensorCommand::SetGain { code })
        }

        "gainx" => {
            let factor = parse_arg::<f32>(&parts, 1, "Usage: gainx <factor>")?;
            Ok(SensorCommand::SetGainFactor { factor })
        }

        "atime" => {
            let atime = parse_arg::<u8>(&parts, 1, "Usage: atime <0-255> <0-65535>")?;
            let astep = parse_arg::<u16>(&parts, 2, "Usage: atime <0-255> <0-65535>")?;
            Ok(SensorCommand::SetIntegration { atime, astep })
        }

        "itime" => {
            let ms = parse_arg::<f32>(&parts, 1, "Usage: itime <ms>")?;
            Ok(SensorCommand::SetIntegrationMs { ms })
        }

        "led" => {
            let current_ma = parse_arg::<u16>(&parts, 1, "Usage: led <mA> [on|off]")?;
            let enabled = match parts.get(2).copied() {
                None | Some("on") => true,
                Some("off") => false,
                Some(other) => return Err(format!("Expected 'on' or 'off', got '{}'", other)),
            };
            Ok(SensorCommand::SetLed { current_ma, enabled })
        }

        "settings" | "get" => Ok(SensorCommand::GetSettings),

        "diag" | "diagnostics" => Ok(SensorCommand::Diagnostics),

        cmd => Err(format!("Unknown command: {}", cmd)),
    }
}

fn parse_arg<T: std::str::FromStr>(parts: &[&str], idx: usize, usage: &str) -> Result<T, String> {
    parts
        .get(idx)
        .ok_or_else(|| usage.to_string())?
        .parse::<T>()
        .map_err(|_| usage.to_string())
}

fn execute_command(
    port: &mut Box<dyn serialport::SerialPort>,
    cmd: SensorCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    // Serialize command with COBS encoding (includes 0x00 terminator)
    let cmd_bytes = postcard::to_allocvec_cobs(&cmd)?;

    port.write_all(&cmd_bytes)?;
    port.flush()?;

    // Receive COBS-encoded response (read until 0x00 sentinel byte)
    let mut rx_buf = vec![];
    let mut byte = [0u8; 1];

    loop {
        match port.read(&mut byte) {
            Ok(1) => {
                rx_buf.push(byte[0]);
                if byte[0] == 0x00 {
                    break;
                }
                if rx_buf.len() > 4096 {
                    return Err("Response too large".into());
                }
            }
            Ok(_) => {
                if !rx_buf.is_empty() {
                    break;
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => {
                if !rx_buf.is_empty() {
                    break;
                }
                return Err("Timed out waiting for response".into());
            }
            Err(e) => {
                return Err(e.into());
            }
        }
    }

    let response: SensorResponse = postcard::from_bytes_cobs(&mut rx_buf)?;

    display_response(&response);

    Ok(())
}

fn display_response(response: &SensorResponse) {
    match response {
        SensorResponse::Ok => {
            println!("OK");
        }

        SensorResponse::Error { message } => {
            eprintln!("Error: {}", message);
        }

        SensorResponse::Reading { reading } => display_reading(reading),

        SensorResponse::Channels {
            group,
            channels,
            gain,
            saturated,
        } => {
            println!("\n{} (gain code {}):", group.name(), gain);
            println!("{:-<40}", "");
            for (name, value) in group.channel_names().iter().zip(channels) {
                println!("{:<8} {:>8}", name, value);
            }
            println!("{:-<40}", "");
            if *saturated {
                println!("WARNING: analog saturation, lower gain or integration time");
            }
        }

        SensorResponse::Flicker { hz } => {
            if *hz == 0 {
                println!("Flicker: undetermined");
            } else {
                println!("Flicker: {} Hz", hz);
            }
        }

        SensorResponse::Gain { code, factor } => {
            println!("Gain code {} (x{})", code, factor);
        }

        SensorResponse::Settings {
            gain,
            gain_factor,
            atime,
            astep,
            integration_time_ms,
        } => {
            println!("\nSensor Settings:");
            println!("{:-<50}", "");
            println!("Gain:               code {} (x{})", gain, gain_factor);
            println!("ATIME:              {}", atime);
            println!("ASTEP:              {}", astep);
            println!("Integration time:   {:.2} ms", integration_time_ms);
            println!("{:-<50}", "");
        }

        SensorResponse::Diagnostics {
            sensor_ready,
            commands_handled,
            readings_taken,
            read_failures,
            flicker_runs,
            uptime_ms,
        } => {
            println!("\nSystem Diagnostics:");
            println!("{:-<50}", "");
            println!("Uptime:                 {:.2} seconds", *uptime_ms as f64 / 1000.0);
            println!("Sensor ready:           {}", if *sensor_ready { "YES" } else { "NO" });
            println!("Commands handled:       {}", commands_handled);
            println!("Readings taken:         {}", readings_taken);
            println!("Read failures:          {}", read_failures);
            println!("Flicker runs:           {}", flicker_runs);
            println!("{:-<50}", "");

            if !*sensor_ready {
                println!("WARNING: Sensor did not initialize (check wiring / I2C address)");
            } else if *read_failures > 0 {
                println!("WARNING: {} readings have failed!", read_failures);
            }
        }
    }
}

fn display_reading(reading: &SpectralReading) {
    println!(
        "\nSpectral Reading ({}, t={}):",
        reading.sensor_id.as_str(),
        format_duration_us(reading.timestamp_us)
    );
    println!("{:-<50}", "");
    let max = reading.all_channels().into_iter().max().unwrap_or(0).max(1);
    for ((name, nm), value) in SpectralReading::CHANNEL_NAMES
        .iter()
        .zip(SpectralReading::CHANNEL_WAVELENGTHS)
        .zip(reading.all_channels())
    {
        let bar = "#".repeat((value as usize * 30) / max as usize);
        let label = if nm == 0 { "   -".to_string() } else { format!("{}nm", nm) };
        println!("{:<6} {:>6} {:>6} {}", name, label, value, bar);
    }
    println!("{:-<50}", "");
    println!("Gain code: {}", reading.gain);
    if reading.saturated {
        println!("WARNING: analog saturation, lower gain or integration time");
    }
}

/// Format microseconds since boot as human-readable duration (HH:MM:SS.mmm)
fn format_duration_us(us: i64) -> String {
    if us <= 0 {
        return "00:00.000".to_string();
    }

    let total_ms = us / 1000;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
    } else {
        format!("{:02}:{:02}.{:03}", mins, secs, ms)
    }
}

fn print_help() {
    println!("Commands:");
    println!("  measure                  - Full 10-band reading (F1-F8, Clear, NIR)");
    println!("  group <F1F4|F5F8|FD>     - Raw ADC values of one channel group");
    println!("  flicker                  - Detect mains flicker (100/120 Hz)");
    println!("  gain <0-10>              - Set gain code (0 = x0.5 ... 10 = x512)");
    println!("  gainx <factor>           - Set highest gain not above factor");
    println!("  atime <atime> <astep>    - Set raw ATIME / ASTEP");
    println!("  itime <ms>               - Set integration time in milliseconds");
    println!("  led <mA> [on|off]        - Set LED current (4-258 mA)");
    println!("  settings                 - Show gain and integration settings");
    println!("  diag                     - Show system diagnostics");
    println!("  help                     - Show this help");
    println!("  exit                     - Exit shell");
    println!();
    println!("Examples:");
    println!("  gain 9                          - x256 for dim scenes");
    println!("  atime 29 599                    - ~50 ms integration");
    println!("  itime 100                       - ~100 ms at the current ASTEP");
    println!("  led 20 on                       - LED on at 20 mA");
    println!("  group F5F8                      - F5-F8, Clear, NIR only");
}
