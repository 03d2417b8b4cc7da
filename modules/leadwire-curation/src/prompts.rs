//! Prompt construction for judgment calls. Pure string building — no
//! scoring or ranking logic lives here.

use leadwire_common::Lead;

/// Byte budget for each side of a pairwise comparison.
const PAIRWISE_PREVIEW_BYTES: usize = 200;

/// Batched multi-criteria evaluation prompt, enumerating leads 1..N.
pub fn criteria_evaluation(leads: &[Lead]) -> String {
    let leads_text = leads
        .iter()
        .enumerate()
        .map(|(i, lead)| format!("{}. {}", i + 1, lead.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are evaluating news leads for their newsworthiness using specific journalistic criteria.

Evaluate each lead on these criteria (1-10 scale):

1. Impact: How many people are affected? (1=few individuals, 10=millions globally)
2. Proximity: Does it cater to a global audience?
   (1=hyper-local interest only, 10=universally relevant)
3. Prominence: Does it involve well-known people?
   (1=unknown individuals, 10=world leaders/A-list celebrities)
4. Relevance: Is this something the audience cares about?
   (1=obscure topic, 10=hot-button issue everyone discusses)
5. Hook: Could this lead grab reader's attention?
   (1=boring/predictable, 10=instantly compelling)
6. Novelty: Is the story unusual or unexpected?
   (1=routine occurrence, 10=unprecedented/shocking)
7. Conflict: Is there disagreement, controversy or drama?
   (1=harmonious/consensual, 10=major dispute/scandal)

Leads to evaluate:
{leads_text}

Return a JSON array with scores for each lead:
[{{
    "index": 1,
    "impact": 8,
    "proximity": 7,
    "prominence": 6,
    "relevance": 9,
    "hook": 8,
    "novelty": 5,
    "conflict": 7,
    "brief_reasoning": "Major event affecting millions with global implications..."
}}]"#
    )
}

/// Pairwise comparison prompt for one similarity group. Pairs are keyed
/// "{i}vs{j}" by 1-based position within the group.
pub fn pairwise_comparison(texts: &[&str]) -> String {
    let mut sections = Vec::new();
    for i in 0..texts.len() {
        for j in (i + 1)..texts.len() {
            sections.push(format!(
                "\nPair {a}vs{b}:\nLead A ({a}): {first}...\nLead B ({b}): {second}...\n",
                a = i + 1,
                b = j + 1,
                first = preview(texts[i]),
                second = preview(texts[j]),
            ));
        }
    }

    format!(
        "For each pair of leads below, determine which is more newsworthy and impactful.\n\
         Consider all evaluation criteria but focus on real-world impact and reader interest.\n\n\
         {comparisons}\n\n\
         Return a JSON array with your decisions:\n\
         [{{\"pair\": \"1vs2\", \"winner\": 1, \"confidence\": \"high\", \
         \"reason\": \"Lead A has broader global impact\"}}]\n\n\
         Note: winner should be either the first or second number from the pair.",
        comparisons = sections.join("\n")
    )
}

/// Truncate a lead preview to the byte budget without splitting a UTF-8
/// character.
fn preview(text: &str) -> &str {
    truncate_to_char_boundary(text, PAIRWISE_PREVIEW_BYTES)
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_prompt_enumerates_leads() {
        let leads = vec![
            Lead::new("Volcano erupts near capital"),
            Lead::new("Treaty signed after decade of talks"),
        ];
        let prompt = criteria_evaluation(&leads);
        assert!(prompt.contains("1. Volcano erupts near capital"));
        assert!(prompt.contains("2. Treaty signed after decade of talks"));
        assert!(prompt.contains("\"index\": 1"));
    }

    #[test]
    fn test_pairwise_prompt_lists_all_pairs() {
        let prompt = pairwise_comparison(&["first lead", "second lead", "third lead"]);
        assert!(prompt.contains("Pair 1vs2:"));
        assert!(prompt.contains("Pair 1vs3:"));
        assert!(prompt.contains("Pair 2vs3:"));
        assert!(prompt.contains("Lead A (1): first lead..."));
    }

    #[test]
    fn test_truncate_to_char_boundary() {
        let text = "Hello 世界";
        let truncated = truncate_to_char_boundary(text, 8);
        assert!(truncated.len() <= 8);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn test_truncate_within_bounds() {
        assert_eq!(truncate_to_char_boundary("Hello", 100), "Hello");
    }
}
