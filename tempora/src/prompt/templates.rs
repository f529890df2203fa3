//! Carried prompt templates.
//!
//! Placeholders: `{forecast_horizon}`, `{input_len}`, `{statistics}`,
//! `{output_example}`, `{input}`, and `{forecast_examples}` on the few-shot
//! variants.

/// Instructions and history only.
pub const ZERO_SHOT: &str = r#"You are a specialist in statistical modeling and machine learning, with expertise in time series forecasting.

Objective:
Predict the next {forecast_horizon} values based on the historical series ({input_len} periods).

Statistical Context (to guide the forecast):
{statistics}

Rules:
1. The forecast should start immediately after the last observed point.
2. Produce only the predicted values, without text, comments, or code.
3. Delimit the output exclusively with <out></out>.

Steps:
1. Analyze the series step by step (internally; do not include this in the final output).
2. Generate the forecast for the next {forecast_horizon} periods.
3. Format the output exactly as in the example, with values inside <out>.

Example:
<out>
{output_example}
</out>

Series Data for Forecast:
{input}
"#;

/// Adds solved examples sampled from the history.
pub const FEW_SHOT: &str = r#"You are a specialist in statistical modeling and machine learning, with expertise in time series forecasting.

Objective:
Predict the next {forecast_horizon} values based on the historical series ({input_len} periods).

Statistical Context (to guide the forecast):
{statistics}

Rules:
1. The forecast should start immediately after the last observed point.
2. Produce only the predicted values, without text, comments, or code.
3. Delimit the output exclusively with <out></out>.

Solved Examples (history and expected forecast):
{forecast_examples}

Steps:
1. Analyze the series step by step (internally; do not include this in the final output).
2. Generate the forecast for the next {forecast_horizon} periods.
3. Format the output exactly as in the examples, with values inside <out>.

Series Data for Forecast:
{input}
"#;

/// Asks for explicit step-by-step reasoning before the forecast.
pub const COT: &str = r#"You are a specialist in statistical modeling and machine learning, with expertise in time series forecasting.

Objective:
Predict the next {forecast_horizon} values based on the historical series ({input_len} periods).

Statistical Context (to guide the forecast):
{statistics}

Rules:
1. The forecast should start immediately after the last observed point.
2. Reason through trend, seasonality, and recent behavior step by step before forecasting.
3. Keep the reasoning outside the delimiters and place only the predicted values inside <out></out>.

Steps:
1. Describe the trend and any seasonal pattern you observe in the series.
2. Explain how the most recent observations affect the forecast.
3. Generate the forecast for the next {forecast_horizon} periods.
4. Format the forecast exactly as in the example, with values inside <out>.

Example:
<out>
{output_example}
</out>

Series Data for Forecast:
{input}
"#;

/// Step-by-step reasoning plus solved examples.
pub const COT_FEW: &str = r#"You are a specialist in statistical modeling and machine learning, with expertise in time series forecasting.

Objective:
Predict the next {forecast_horizon} values based on the historical series ({input_len} periods).

Statistical Context (to guide the forecast):
{statistics}

Rules:
1. The forecast should start immediately after the last observed point.
2. Reason through trend, seasonality, and recent behavior step by step before forecasting.
3. Keep the reasoning outside the delimiters and place only the predicted values inside <out></out>.

Solved Examples (history and expected forecast):
{forecast_examples}

Steps:
1. Describe the trend and any seasonal pattern you observe in the series.
2. Explain how the most recent observations affect the forecast.
3. Generate the forecast for the next {forecast_horizon} periods.
4. Format the forecast exactly as in the examples, with values inside <out>.

Series Data for Forecast:
{input}
"#;
