//! Instruction text sent alongside the image.

use crate::result::Category;

/// Keys the model is asked to return.
pub const ANSWER_KEYS: [&str; 4] = ["kategori", "guven_skoru", "analiz_detaylari", "aciklama"];

/// Build the instruction for one request.
///
/// The template fixes the answer shape and the two labels. `criteria` is the
/// deployer's description of when each label applies.
pub fn instruction(criteria: Option<&str>) -> String {
    let labels = Category::ALL
        .iter()
        .map(|c| format!("\"{}\"", c.as_str()))
        .collect::<Vec<_>>()
        .join(" or ");

    let mut text = format!(
        "Analyze this image and categorize it as {labels}.\n"
    );

    if let Some(criteria) = criteria.map(str::trim).filter(|c| !c.is_empty()) {
        text.push_str("\nCRITERIA:\n");
        text.push_str(criteria);
        text.push('\n');
    }

    text.push_str(
        r#"
ANSWER FORMAT:
{
  "kategori": one of the labels above,
  "guven_skoru": integer between 1 and 100,
  "analiz_detaylari": { "<observation name>": "<short observation>", ... },
  "aciklama": "reasoning behind the decision"
}

Answer with JSON only, without any additional explanation.
"#,
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_names_both_labels_and_keys() {
        let text = instruction(None);
        assert!(text.contains("\"PEMBE\" or \"KARA\""));
        for key in ANSWER_KEYS {
            assert!(text.contains(key), "missing {}", key);
        }
        assert!(!text.contains("CRITERIA"));
    }

    #[test]
    fn criteria_are_embedded_when_present() {
        let text = instruction(Some("  PEMBE for flowers, KARA otherwise  "));
        assert!(text.contains("CRITERIA:\nPEMBE for flowers, KARA otherwise\n"));
        assert!(!instruction(Some("   ")).contains("CRITERIA"));
    }
}
