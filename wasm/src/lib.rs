use tritone_core::compare::positional_accuracy;
use tritone_core::{Encoder, FilterBankDecoder, SpectralDecoder, ToneModemError};
use wasm_bindgen::prelude::*;

fn to_js(e: ToneModemError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmModem {
    encoder: Encoder,
    spectral: SpectralDecoder,
    filter_bank: FilterBankDecoder,
}

#[wasm_bindgen]
impl WasmModem {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmModem, JsValue> {
        Ok(WasmModem {
            encoder: Encoder::new().map_err(to_js)?,
            spectral: SpectralDecoder::new().map_err(to_js)?,
            filter_bank: FilterBankDecoder::new().map_err(to_js)?,
        })
    }

    /// Encode text into a Float32Array at 44100 Hz
    /// Characters outside a-z and space are skipped
    #[wasm_bindgen]
    pub fn encode(&self, text: &str) -> Vec<f32> {
        self.encoder.encode(text)
    }

    #[wasm_bindgen(js_name = decodeSpectral)]
    pub fn decode_spectral(&self, samples: &[f32]) -> Result<String, JsValue> {
        self.spectral.decode(samples).map_err(to_js)
    }

    #[wasm_bindgen(js_name = decodeFilterBank)]
    pub fn decode_filter_bank(&self, samples: &[f32]) -> Result<String, JsValue> {
        self.filter_bank.decode(samples).map_err(to_js)
    }

    /// Decode both ways and summarize the agreement
    ///
    /// Timings are left out: `std::time::Instant` is unavailable on
    /// wasm32-unknown-unknown, so the browser host measures them itself.
    #[wasm_bindgen]
    pub fn compare(&self, samples: &[f32]) -> Result<String, JsValue> {
        if samples.is_empty() {
            return Err(to_js(ToneModemError::EmptySignal));
        }
        let spectral = self.decode_spectral(samples)?;
        let filter_bank = self.decode_filter_bank(samples)?;
        let agreement = positional_accuracy(&spectral, &filter_bank).unwrap_or(0.0);

        Ok(format!(
            "Decoded (spectral):\n{}\nDecoded (filter bank):\n{}\nDecoder agreement: {:.2}%",
            spectral,
            filter_bank,
            agreement * 100.0
        ))
    }
}
