//! Line-oriented ingestion for qtempo
//!
//! Decodes a token-per-field textual format into submissions against the
//! scheduling builder. One operation per line, tokens separated by single
//! spaces or commas; the registry decides how many tokens are resources
//! and how many are parameters.

use qtempo_core::{ParamMap, ParamValue, SchedError, SchedResult};
use qtempo_schedule::{Builder, OpHandle};

/// Reserved gate name with the fixed line shape `measure <qubit> -> <bit>;`
const MEASURE_GATE: &str = "measure";

/// Parameter under which a measurement's classical sink travels
const OUTPUT_BIT_PARAM: &str = "output_bit";

/// Ingest lines of gate text into a builder
///
/// Blank lines and `#`/`//` comment lines are skipped; a single trailing
/// `;` per line is tolerated. `resources_first` selects whether resource
/// tokens precede parameter tokens or follow them. `static_params` are
/// merged beneath each line's own parameters (the line wins) and reach
/// the behavior hook even when not declared by the gate.
///
/// Any failure is reported as [`SchedError::MalformedLine`] carrying the
/// raw line and the resolved gate, resources and parameters; no line is
/// ever skipped or partially applied beyond the failing submission.
///
/// Returns the handles of marker-bearing submissions, in order. The
/// textual format itself has no marker syntax, so the list is empty
/// unless a caller layers one on top.
pub fn ingest_lines<I>(
    builder: &mut Builder,
    lines: I,
    resources_first: bool,
    static_params: &ParamMap,
) -> SchedResult<Vec<OpHandle>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let handles = Vec::new();

    for raw in lines {
        let raw = raw.as_ref();
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        let line = line.strip_suffix(';').unwrap_or(line).trim_end();

        let tokens: Vec<&str> = line
            .split([' ', ','])
            .filter(|token| !token.is_empty())
            .collect();
        let Some(&name) = tokens.first() else {
            continue;
        };

        if name == MEASURE_GATE {
            ingest_measure(builder, raw, &tokens)?;
            continue;
        }

        ingest_gate(builder, raw, &tokens, resources_first, static_params)?;
    }

    Ok(handles)
}

/// Ingest a whole text, line by line
pub fn ingest_str(
    builder: &mut Builder,
    text: &str,
    resources_first: bool,
    static_params: &ParamMap,
) -> SchedResult<Vec<OpHandle>> {
    ingest_lines(builder, text.lines(), resources_first, static_params)
}

fn ingest_measure(builder: &mut Builder, raw: &str, tokens: &[&str]) -> SchedResult<()> {
    if tokens.len() != 4 || tokens[2] != "->" {
        return Err(SchedError::MalformedLine {
            line: raw.trim().to_string(),
            reason: "measurement line must look like 'measure <qubit> -> <bit>;'".to_string(),
        });
    }

    let qubit = tokens[1];
    let mut params = ParamMap::new();
    params.insert(
        OUTPUT_BIT_PARAM.to_string(),
        ParamValue::Text(tokens[3].to_string()),
    );

    builder
        .add_gate(MEASURE_GATE, &[qubit], params.clone())
        .map_err(|err| submission_context(raw, MEASURE_GATE, &[qubit], &params, err))
}

fn ingest_gate(
    builder: &mut Builder,
    raw: &str,
    tokens: &[&str],
    resources_first: bool,
    static_params: &ParamMap,
) -> SchedResult<()> {
    let name = tokens[0];
    let family = builder
        .gate_set()
        .family(name)
        .map_err(|_| SchedError::MalformedLine {
            line: raw.trim().to_string(),
            reason: format!("unknown gate '{}'", name),
        })?
        .clone();

    let expected = 1 + family.num_resources + family.param_names.len();
    if tokens.len() != expected {
        return Err(SchedError::MalformedLine {
            line: raw.trim().to_string(),
            reason: format!(
                "gate '{}' needs {} resource and {} parameter tokens, line has {}",
                name,
                family.num_resources,
                family.param_names.len(),
                tokens.len() - 1
            ),
        });
    }

    let (resources, param_tokens) = if resources_first {
        let resources = &tokens[1..1 + family.num_resources];
        (resources, &tokens[1 + family.num_resources..])
    } else {
        let params = &tokens[1..1 + family.param_names.len()];
        (&tokens[1 + family.param_names.len()..], params)
    };

    // Fresh merge per line: statics first, line values win.
    let mut params = static_params.clone();
    for (kw, token) in family.param_names.iter().zip(param_tokens.iter()) {
        params.insert(kw.clone(), ParamValue::parse(token));
    }

    builder
        .add_gate(name, resources, params.clone())
        .map_err(|err| submission_context(raw, name, resources, &params, err))
}

fn submission_context(
    raw: &str,
    name: &str,
    resources: &[&str],
    params: &ParamMap,
    err: SchedError,
) -> SchedError {
    SchedError::MalformedLine {
        line: raw.trim().to_string(),
        reason: format!(
            "gate '{}' on {:?} with params {:?}: {}",
            name, resources, params, err
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================
