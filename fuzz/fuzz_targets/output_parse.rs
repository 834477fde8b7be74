#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mdv_output::{parse_output, repair_exponents};

#[derive(Debug, Arbitrary)]
struct OutputInput {
    n_channels: u8,
    with_banner: bool,
    rows: Vec<Vec<f64>>,
    trailer: String,
}

/// Assemble a syntactically plausible table from the structured input,
/// then let the arbitrary trailer stress the block terminator.
fn build_table(input: &OutputInput) -> String {
    let n = usize::from(input.n_channels % 8) + 2;
    let mut text = String::new();
    if input.with_banner {
        text.push_str("These predictions were generated by MoorDyn v2\n");
    }
    for c in 0..n {
        text.push_str(&format!("Ch{c} "));
    }
    text.push('\n');
    for _ in 0..n {
        text.push_str("(-) ");
    }
    text.push('\n');
    for row in input.rows.iter().take(64) {
        for c in 0..n {
            let v = row.get(c).copied().unwrap_or(0.0);
            let v = if v.is_finite() { v } else { 0.0 };
            text.push_str(&format!("{v} "));
        }
        text.push('\n');
    }
    text.push_str(&input.trailer);
    text
}

fuzz_target!(|input: OutputInput| {
    // Repair is idempotent on any text.
    let repaired = repair_exponents(&input.trailer);
    assert_eq!(repair_exponents(&repaired), repaired);

    let text = build_table(&input);
    if let Ok(Some(matrix)) = parse_output(&text) {
        // Every surviving row matches the header width.
        assert!(matrix.rows().iter().all(|r| r.len() == matrix.n_channels()));
        assert_eq!(matrix.by_channel().len(), matrix.n_channels());
    }
});
