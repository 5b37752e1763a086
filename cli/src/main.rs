mod wav;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tritone_core::resample::conform;
use tritone_core::{
    Comparator, ComparisonReport, Encoder, FilterBankDecoder, SpectralDecoder, WaveformSink,
    WaveformSource,
};
use wav::WavFile;

#[derive(Parser)]
#[command(name = "tritone")]
#[command(about = "Three-tone text modem: encode text to audio and decode it two ways")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text to a WAV audio file
    Encode {
        /// Text to send (a-z and space; anything else is skipped)
        #[arg(value_name = "TEXT")]
        text: String,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Decode a WAV audio file to text
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Demodulation method
        #[arg(short, long, value_enum, default_value_t = Method::Spectral)]
        method: Method,

        /// Write the decoded text to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a WAV file with both methods and compare them
    Compare {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode text in memory, decode it both ways and score the result
    Roundtrip {
        /// Text to send
        #[arg(value_name = "TEXT")]
        text: String,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Spectrogram peak picking
    Spectral,
    /// Butterworth bandpass filter bank
    FilterBank,
}

#[derive(Serialize)]
struct CompareOutput<'a> {
    spectral: &'a str,
    filter_bank: &'a str,
    spectral_seconds: f64,
    filter_bank_seconds: f64,
    agreement: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spectral_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_bank_accuracy: Option<f64>,
}

impl<'a> CompareOutput<'a> {
    fn new(report: &'a ComparisonReport, reference: Option<&'a str>) -> Self {
        let scores = reference.and_then(|r| report.accuracy_against(r));
        Self {
            spectral: &report.spectral,
            filter_bank: &report.filter_bank,
            spectral_seconds: report.spectral_elapsed.as_secs_f64(),
            filter_bank_seconds: report.filter_bank_elapsed.as_secs_f64(),
            agreement: report.accuracy,
            reference,
            spectral_accuracy: scores.map(|s| s.0),
            filter_bank_accuracy: scores.map(|s| s.1),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode { text, output } => encode_command(&text, &output)?,
        Commands::Decode {
            input,
            method,
            output,
        } => decode_command(&input, method, output.as_ref())?,
        Commands::Compare { input, json } => compare_command(&input, json)?,
        Commands::Roundtrip { text, json } => roundtrip_command(&text, json)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn encode_command(text: &str, output_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let encoder = Encoder::new()?;

    let skipped = encoder.table().unsupported(text);
    if !skipped.is_empty() {
        let listed: String = skipped.iter().map(|(_, c)| *c).collect();
        println!("Skipped {} unsupported characters: {:?}", skipped.len(), listed);
    }

    let samples = encoder.encode(text);
    println!(
        "Encoded {} characters to {} audio samples",
        text.chars().count() - skipped.len(),
        samples.len()
    );

    WavFile::new(output_path).store(&samples, encoder.config().sample_rate)?;
    println!("Wrote {}", output_path.display());
    Ok(())
}

fn load_samples(input_path: &PathBuf, sample_rate: u32) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let waveform = WavFile::new(input_path).load()?;
    log::info!(
        "Read {} samples at {} Hz ({:.2} seconds)",
        waveform.samples.len(),
        waveform.sample_rate,
        waveform.duration_secs()
    );
    Ok(conform(&waveform, sample_rate))
}

fn decode_command(
    input_path: &PathBuf,
    method: Method,
    output_path: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let sample_rate = tritone_core::SAMPLE_RATE as u32;
    let samples = load_samples(input_path, sample_rate)?;

    let text = match method {
        Method::Spectral => SpectralDecoder::new()?.decode(&samples)?,
        Method::FilterBank => FilterBankDecoder::new()?.decode(&samples)?,
    };

    match output_path {
        Some(path) => {
            std::fs::write(path, &text)?;
            println!("Decoded {} characters to {}", text.chars().count(), path.display());
        }
        None => println!("Decoded text: {}", text),
    }
    Ok(())
}

fn compare_command(input_path: &PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sample_rate = tritone_core::SAMPLE_RATE as u32;
    let samples = load_samples(input_path, sample_rate)?;

    let report = Comparator::new()?.compare(&samples)?;
    print_report(&report, None, json)
}

fn roundtrip_command(text: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let encoder = Encoder::new()?;
    let samples = encoder.encode(text);

    let report = Comparator::new()?.compare(&samples)?;
    print_report(&report, Some(text), json)
}

fn print_report(
    report: &ComparisonReport,
    reference: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let output = CompareOutput::new(report, reference);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", report);
    if let Some((spectral, filter_bank)) = reference.and_then(|r| report.accuracy_against(r)) {
        println!("Spectral accuracy: {:.2}%", spectral * 100.0);
        println!("Filter bank accuracy: {:.2}%", filter_bank * 100.0);
    }
    Ok(())
}
