use llmsieve::extract::{balance, extract, normalize, synthesize};
use llmsieve::{Extractor, FallbackPolicy, FieldKind, FieldSpec, SchemaDescriptor, ValidationOutcome};
use serde_json::{json, Value};

fn sentiment_schema() -> SchemaDescriptor {
    SchemaDescriptor::new(vec![
        FieldSpec::required("sentiment", FieldKind::String).one_of(&["positive", "negative", "neutral"]),
        FieldSpec::required("score", FieldKind::Number).range(0.0, 1.0),
    ])
}

fn parse(s: &str) -> Option<Value> {
    serde_json::from_str(s).ok()
}

#[test]
fn clean_json_passes_through_normalizer() {
    let docs = [
        r#"{"a": 1, "b": [true, null, "x"]}"#,
        r#"[{"text": "Paris", "type": "location"}]"#,
        r#"{"nested": {"deep": {"s": "a } brace in a string"}}}"#,
        "{}",
    ];
    for doc in docs {
        assert_eq!(parse(&normalize(doc)), parse(doc), "{doc}");
    }
}

#[test]
fn fenced_json_yields_inner_text() {
    let inner = r#"{"keywords": [{"text": "rust", "relevance": 0.9}]}"#;
    for raw in [
        format!("```json\n{inner}\n```"),
        format!("```\n{inner}\n```"),
        format!("Here you go:\n```json\n{inner}\n```\nLet me know!"),
    ] {
        assert_eq!(normalize(&raw), inner);
    }
}

#[test]
fn missing_closers_are_recovered() {
    let doc = r#"{"plan": [{"day": 1, "meals": ["a", "b"]}, {"day": 2, "meals": []}]}"#;
    for n in 0..=6 {
        let truncated = &doc[..doc.len() - n];
        let closers = &doc[doc.len() - n..];
        if closers.chars().all(|c| c == '}' || c == ']') {
            let out = balance(truncated);
            assert_eq!(parse(&out), parse(doc), "n={n}");
        }
    }
}

#[test]
fn missing_required_field_is_named() {
    let schema = sentiment_schema();
    let outcome = schema.validate(&json!({"score": 0.3}));
    assert!(outcome.messages().iter().any(|m| m.contains("sentiment")));

    let conforming = json!({"sentiment": "neutral", "score": 0.5});
    assert!(schema.validate(&conforming).is_valid());
}

#[test]
fn fallback_is_deterministic() {
    let schema = sentiment_schema();
    let template = json!({"sentiment": "unknown", "score": 9});
    let first = synthesize(&schema, &template);
    for _ in 0..5 {
        assert_eq!(synthesize(&schema, &template), first);
    }
    assert!(schema.validate(&first).is_valid());
}

#[test]
fn scenario_fenced_after_prose() {
    let raw = "Sure! ```json\n{\"sentiment\": \"positive\", \"score\": 0.8}\n```";
    assert_eq!(
        extract(raw, &sentiment_schema()),
        ValidationOutcome::Valid(json!({"sentiment": "positive", "score": 0.8}))
    );
}

#[test]
fn scenario_truncated_and_out_of_range() {
    let raw = "{\"sentiment\": \"great\", \"score\": 5";
    assert_eq!(
        extract(raw, &sentiment_schema()).messages(),
        vec!["sentiment must be one of positive,negative,neutral", "score out of range [0,1]"]
    );
}

#[test]
fn scenario_no_json_degrades() {
    let raw = "I cannot analyze this.";
    assert_eq!(extract(raw, &sentiment_schema()).messages(), vec!["no JSON object found"]);

    let extractor = Extractor::new(
        sentiment_schema(),
        &json!({"sentiment": "neutral", "score": 0}),
        FallbackPolicy::Degrade,
    );
    let extraction = extractor.run(raw);
    assert!(extraction.is_degraded());
    assert_eq!(extraction.result(), Some(&json!({"sentiment": "neutral", "score": 0})));

    let surfacing = Extractor::new(sentiment_schema(), &json!({}), FallbackPolicy::Surface);
    let extraction = surfacing.run(raw);
    assert!(extraction.fallback.is_none());
    assert!(!extraction.outcome.is_valid());
}

#[test]
fn python_style_output_is_repaired() {
    let raw = "{'sentiment': 'negative', 'score': 0.2, 'sarcastic': False,}";
    let outcome = extract(raw, &sentiment_schema());
    assert_eq!(
        outcome,
        ValidationOutcome::Valid(json!({"sentiment": "negative", "score": 0.2, "sarcastic": false}))
    );
}

#[test]
fn extractor_is_shareable_across_threads() {
    let extractor = std::sync::Arc::new(Extractor::new(
        sentiment_schema(),
        &json!({"sentiment": "neutral", "score": 0}),
        FallbackPolicy::Degrade,
    ));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let extractor = std::sync::Arc::clone(&extractor);
            std::thread::spawn(move || {
                let raw = format!("{{\"sentiment\": \"positive\", \"score\": 0.{i}}}");
                extractor.run(&raw).outcome.is_valid()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
