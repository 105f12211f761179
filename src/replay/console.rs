use crate::replay::replay_model::ReplayResult;

// ============================================================================
// Console report
// ============================================================================

/// Format replay results for terminal output.
///
/// Produces output like:
/// ```text
/// ✓ PASS  select and submit (9 steps, 4 expectations)
/// ✗ FAIL  timeout re-arms form (6 steps, 3 expectations)
///     [FAIL] Step 5: Busy: Busy expectation not met (actual: true)
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(results: &[ReplayResult]) -> String {
    let mut out = String::new();

    for result in results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} expectations)\n",
            marker,
            result.script_name,
            result.steps_run,
            result.expectation_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for er in result.expectation_results.iter().filter(|r| !r.passed) {
            let detail = er.message.as_deref().unwrap_or("expectation failed");
            let actual = er.actual.as_deref().unwrap_or("-");
            out.push_str(&format!(
                "    [FAIL] Step {}: {}: {} (actual: {})\n",
                er.step_index,
                er.spec.name(),
                detail,
                actual
            ));
        }
    }

    let passed = results.iter().filter(|r| r.passed).count();
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total) ===\n",
        passed,
        results.len() - passed,
        results.len()
    ));

    out
}
