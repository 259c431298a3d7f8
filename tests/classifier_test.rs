use categorizer::{ClassDefinition, Classifier, ClassifierError, TrainingSet};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

fn setup_test_classifier() -> Classifier {
    Classifier::builder()
        .with_training_set(TrainingSet::builtin())
        .unwrap()
        .build()
        .expect("Failed to create classifier")
}

#[test]
fn test_training_examples_predict_their_label() {
    let classifier = setup_test_classifier();
    for (text, category) in TrainingSet::builtin().examples() {
        assert_eq!(
            classifier.predict_label(text).unwrap(),
            category,
            "wrong label for '{}'",
            text
        );
    }
}

#[test]
fn test_known_products() -> Result<(), ClassifierError> {
    let classifier = setup_test_classifier();
    assert_eq!(classifier.predict_label("iphone")?, "electronics");
    assert_eq!(classifier.predict_label("wallet")?, "accessories");
    assert_eq!(classifier.predict_label("laptop")?, "electronics");
    assert_eq!(classifier.predict_label("Dell LAPTOP!")?, "electronics");
    assert_eq!(classifier.predict_label("my lost phone")?, "electronics");
    Ok(())
}

#[test]
fn test_unknown_words_fall_back_to_prior() -> Result<(), ClassifierError> {
    let classifier = setup_test_classifier();
    // accessories has 12 of the 23 examples
    assert_eq!(classifier.predict_label("xyz")?, "accessories");
    assert_eq!(classifier.predict_label("a b")?, "accessories");

    let (_, scores) = classifier.predict("umbrella")?;
    assert!((scores["accessories"] - 12.0 / 23.0).abs() < 1e-9);
    assert!((scores["electronics"] - 11.0 / 23.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_vocabulary_matches_training_tokens() {
    let classifier = setup_test_classifier();
    let expected: BTreeSet<String> = TrainingSet::builtin()
        .texts()
        .iter()
        .flat_map(|t| t.split_whitespace().map(str::to_lowercase))
        .collect();
    let actual: BTreeSet<String> = classifier.vectorizer().vocabulary().keys().cloned().collect();
    assert_eq!(actual, expected);
    assert_eq!(actual.len(), 24);
}

#[test]
fn test_prediction_is_deterministic() {
    let first = setup_test_classifier();
    let second = setup_test_classifier();
    for text in ["iphone", "wallet", "laptop bag", "rolex smartwatch"] {
        let a = first.predict(text).unwrap();
        let b = first.predict(text).unwrap();
        let c = second.predict(text).unwrap();
        assert_eq!(a.0, b.0);
        assert_eq!(a.0, c.0);
        assert_eq!(a.1, c.1);
    }
}

#[test]
fn test_prediction_validation() {
    let classifier = setup_test_classifier();
    assert!(classifier.predict("").is_err());
    assert!(classifier.predict("   ").is_err());
    let long_text = "charger ".repeat(1000);
    assert_eq!(classifier.predict_label(&long_text).unwrap(), "accessories");
}

#[test]
fn test_thread_safety() {
    let classifier = Arc::new(setup_test_classifier());
    let mut handles = vec![];

    for text in ["iphone", "wallet", "cable"] {
        let classifier = Arc::clone(&classifier);
        handles.push(thread::spawn(move || classifier.predict_label(text).unwrap()));
    }

    let labels: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(labels, vec!["electronics", "accessories", "accessories"]);
}

#[test]
fn test_custom_classes() -> Result<(), ClassifierError> {
    let classifier = Classifier::builder()
        .with_alpha(0.5)
        .add_class(
            ClassDefinition::new("documents")
                .with_description("Identity papers and cards")
                .with_examples(vec!["passport", "id card", "driving licence"]),
        )?
        .add_class(ClassDefinition::new("keys").with_examples(vec!["car keys", "house key"]))?
        .build()?;

    let info = classifier.info();
    assert_eq!(info.class_labels, vec!["documents", "keys"]);
    assert_eq!(info.alpha, 0.5);
    assert_eq!(classifier.predict_label("lost passport")?, "documents");
    assert_eq!(classifier.predict_label("spare car keys")?, "keys");
    Ok(())
}

#[test]
fn test_mismatched_dataset_aborts() {
    let set = TrainingSet::new(vec!["laptop", "wallet", "bag"], vec!["electronics", "accessories"]);
    let result = Classifier::builder().with_training_set(set);
    assert!(matches!(
        result,
        Err(ClassifierError::DatasetMismatch { texts: 3, categories: 2 })
    ));
}
