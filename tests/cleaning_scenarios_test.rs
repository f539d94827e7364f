use notes_cleanse::{
    BulkReplacer, CleaningPipeline, CompiledDictionary, DictionaryCompiler, FrequencyCounter, RawEntry,
    TextNormalizer, TextUnit,
};

fn compile(rows: &[(&str, &str)]) -> CompiledDictionary {
    DictionaryCompiler::default()
        .compile(rows.iter().map(|(s, f)| RawEntry::new(*s, *f)))
        .unwrap()
}

#[test]
fn test_heart_rate_scenario() {
    let dict = compile(&[("hr", "heart rate"), ("c/o", "complains of")]);
    let mut counter = FrequencyCounter::new();

    let replaced = BulkReplacer::from_dictionary(&dict)
        .replace("Pt c/o elevated HR today!", &mut counter)
        .unwrap();
    assert_eq!(replaced, "pt complains of elevated heart rate today!");
    assert_eq!(counter.get("c/o"), 1);
    assert_eq!(counter.get("hr"), 1);

    assert_eq!(
        TextNormalizer::normalize(&replaced),
        "pt complains of elevated heart rate today"
    );
}

#[test]
fn test_empty_dictionary_scenario() {
    let dict = DictionaryCompiler::default().compile(Vec::new()).unwrap();
    let outcome = CleaningPipeline::new(&dict)
        .run(&[TextUnit::from("No Shorthand   here")])
        .unwrap();

    assert_eq!(outcome.units[0].cleaned, "no shorthand here");
    assert!(outcome.counter.is_empty());
}

#[test]
fn test_text_without_shorthand_is_only_lowercased() {
    let dict = compile(&[("bid", "twice daily"), ("prn", "as needed")]);
    let texts = ["Vitals WNL.", "BIDDING war", "sprint; PRNX", ""];

    for text in texts {
        let mut counter = FrequencyCounter::new();
        let replaced = BulkReplacer::from_dictionary(&dict)
            .replace(text, &mut counter)
            .unwrap();
        assert_eq!(replaced, text.to_lowercase());
        assert!(counter.is_empty(), "unexpected match in {:?}", text);
    }
}

#[test]
fn test_single_bounded_occurrence_counts_once() {
    let dict = compile(&[("sob", "shortness of breath")]);
    for text in ["sob", "(SOB)", "pt w/ sob.", "sob,cough"] {
        let mut counter = FrequencyCounter::new();
        let replaced = BulkReplacer::from_dictionary(&dict)
            .replace(text, &mut counter)
            .unwrap();
        assert_eq!(replaced.matches("shortness of breath").count(), 1, "{}", text);
        assert_eq!(counter.get("sob"), 1);
    }
}

#[test]
fn test_overlapping_keys_only_count_whole_tokens() {
    let dict = compile(&[("o", "oral"), ("c/o", "complains of")]);
    let mut counter = FrequencyCounter::new();

    let replaced = BulkReplacer::from_dictionary(&dict)
        .replace("Pt c/o pain, meds p o, oxygen", &mut counter)
        .unwrap();

    assert_eq!(replaced, "pt complains of pain, meds p oral, oxygen");
    assert_eq!(counter.get("c/o"), 1);
    assert_eq!(counter.get("o"), 1);
}

#[test]
fn test_duplicate_key_policy() {
    let dict = compile(&[("bid", "twice daily"), ("bid", "two times a day")]);
    assert_eq!(dict.table.full_form("bid"), Some("two times a day"));

    let outcome = CleaningPipeline::new(&dict)
        .run(&[TextUnit::from("Metoprolol BID")])
        .unwrap();
    assert_eq!(outcome.units[0].cleaned, "metoprolol two times a day");
}

#[test]
fn test_pipeline_is_deterministic_across_runs() {
    let dict = compile(&[("hr", "heart rate"), ("bp", "blood pressure"), ("c/o", "complains of")]);
    let units: Vec<TextUnit> = [
        "HR 110, BP 90/60!!",
        "c/o CP x2 days",
        "   ",
        "bp bp bp",
    ]
    .into_iter()
    .map(TextUnit::from)
    .collect();

    let first = CleaningPipeline::new(&dict).run(&units).unwrap();
    let second = CleaningPipeline::new(&dict).run(&units).unwrap();
    let parallel = CleaningPipeline::new(&dict).run_parallel(&units, 3).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, parallel);
    assert_eq!(first.counter.get("bp"), 4);
    assert_eq!(first.units[0].cleaned, "heart rate 110, blood pressure 90/60");
    assert_eq!(first.units[2].cleaned, "");
}

#[test]
fn test_normalize_is_idempotent() {
    let samples = [
        "pt complains of elevated heart rate today!",
        "\t a  //  b ,, c \n",
        "ünïcode — text…",
        "[[x]] {y} <z>",
    ];
    for sample in samples {
        let once = TextNormalizer::normalize(sample);
        assert_eq!(TextNormalizer::normalize(&once), once);
    }
}
