use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod scoring;
pub mod transposition;

pub use config::AnalyzerConfig;
pub use error::AnalysisError;
pub use scoring::analyzer::{Analyzer, Attempt, Feedback};
pub use scoring::judgment::{JudgmentPolicy, Tier};
pub use scoring::severity::Advice;
pub use scoring::types::{
    ClassifiedError, ErrorBucket, ErrorSet, MistakeCategory, NoteEvent, NoteSequence, RawGap,
};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn sequence_from_js(value: JsValue) -> Result<NoteSequence, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

fn analyzer_from_js(config_js: JsValue) -> Result<Analyzer, JsValue> {
    let config: AnalyzerConfig = if config_js.is_null() || config_js.is_undefined() {
        AnalyzerConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config_js).map_err(to_js_error)?
    };
    Ok(Analyzer::new(config))
}

fn compare_js(
    reference_js: JsValue,
    user_js: JsValue,
    config_js: JsValue,
) -> Result<(Analyzer, ErrorSet), JsValue> {
    let analyzer = analyzer_from_js(config_js)?;
    let reference = sequence_from_js(reference_js)?;
    let user = sequence_from_js(user_js)?;
    let errors = analyzer.compare(&reference, &user).map_err(to_js_error)?;
    Ok((analyzer, errors))
}

/// Compare an attempt against the reference; returns the four error lists.
/// Note arrays are `[{pitch, onset}, ...]`; `config_js` may be null.
#[wasm_bindgen]
pub fn compare_performances(
    reference_js: JsValue,
    user_js: JsValue,
    config_js: JsValue,
) -> Result<JsValue, JsValue> {
    let (_, errors) = compare_js(reference_js, user_js, config_js)?;
    serde_wasm_bindgen::to_value(&errors).map_err(to_js_error)
}

/// Compare and judge: returns `{sufficient, errors}`.
#[wasm_bindgen]
pub fn judge_attempt(
    reference_js: JsValue,
    user_js: JsValue,
    config_js: JsValue,
) -> Result<JsValue, JsValue> {
    let analyzer = analyzer_from_js(config_js)?;
    let reference = sequence_from_js(reference_js)?;
    let user = sequence_from_js(user_js)?;
    let attempt = analyzer
        .judge_attempt(&reference, &user)
        .map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&attempt).map_err(to_js_error)
}

/// Errors grouped by onset time, each bucket tagged with a mistake category.
#[wasm_bindgen]
pub fn error_timeline(
    reference_js: JsValue,
    user_js: JsValue,
    config_js: JsValue,
) -> Result<JsValue, JsValue> {
    let (analyzer, errors) = compare_js(reference_js, user_js, config_js)?;
    serde_wasm_bindgen::to_value(&analyzer.timeline(&errors)).map_err(to_js_error)
}

/// Bucket times as a Float64Array, for placing markers on the keyboard view.
#[wasm_bindgen]
pub fn error_times(
    reference_js: JsValue,
    user_js: JsValue,
    config_js: JsValue,
) -> Result<js_sys::Float64Array, JsValue> {
    let (analyzer, errors) = compare_js(reference_js, user_js, config_js)?;
    let timeline = analyzer.timeline(&errors);

    let arr = js_sys::Float64Array::new_with_length(timeline.len() as u32);
    for (i, bucket) in timeline.iter().enumerate() {
        arr.set_index(i as u32, bucket.time as f64);
    }
    Ok(arr)
}

/// The single correction to surface. Throws when the attempt has no errors.
#[wasm_bindgen]
pub fn worst_mistake(
    reference_js: JsValue,
    user_js: JsValue,
    config_js: JsValue,
) -> Result<JsValue, JsValue> {
    let (analyzer, errors) = compare_js(reference_js, user_js, config_js)?;
    let advice = analyzer.worst_mistake(&errors).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&advice).map_err(to_js_error)
}

/// Judgment plus advice in one call: `{sufficient, errors, advice}`.
#[wasm_bindgen]
pub fn performance_feedback(
    reference_js: JsValue,
    user_js: JsValue,
    config_js: JsValue,
) -> Result<JsValue, JsValue> {
    let analyzer = analyzer_from_js(config_js)?;
    let reference = sequence_from_js(reference_js)?;
    let user = sequence_from_js(user_js)?;
    let feedback = analyzer.feedback(&reference, &user).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&feedback).map_err(to_js_error)
}
