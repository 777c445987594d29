use track_health::filter::{BatchFilter, Expr, ExpressionFilter, LiteralValue};
use track_health::{Condition, TrackHealthError};

use crate::utils::scored_clusters;

#[test]
fn condition_filter_matches_typed_records() {
    let table = scored_clusters(15);

    for condition in Condition::ALL {
        let rows = table
            .matching_rows(&Expr::condition_is(condition))
            .expect("filter evaluates");
        assert_eq!(rows, table.rows_with_condition(condition));
        assert_eq!(rows.len(), 5);
    }
}

#[test]
fn filtered_batch_keeps_only_matching_rows() {
    let table = scored_clusters(9);
    let danger = ExpressionFilter::condition(Condition::Danger)
        .filter(table.batch())
        .expect("filter applies");

    assert_eq!(danger.num_rows(), 3);
    assert_eq!(danger.schema(), table.batch().schema());
}

#[test]
fn combined_expressions() {
    let table = scored_clusters(9);
    let not_good_or_ok = Expr::NotIn(
        "Condition".to_string(),
        vec![
            LiteralValue::String("Good".to_string()),
            LiteralValue::String("OK".to_string()),
        ],
    );
    let danger_and_fault = Expr::And(vec![
        Expr::condition_is(Condition::Danger),
        Expr::eq_str("Predicted_Label", "bearing_fault"),
    ]);

    assert_eq!(
        table.matching_rows(&not_good_or_ok).expect("evaluates"),
        vec![2, 5, 8]
    );
    assert_eq!(
        table.matching_rows(&danger_and_fault).expect("evaluates"),
        vec![2, 5, 8]
    );
    assert_eq!(
        ExpressionFilter::new(danger_and_fault).required_columns().len(),
        2
    );
}

#[test]
fn unknown_column_is_a_filter_error() {
    let table = scored_clusters(6);
    let err = table
        .filter(&Expr::eq_str("Track_Id", "A1"))
        .expect_err("column does not exist");
    assert!(matches!(err, TrackHealthError::Filter(msg) if msg.contains("Track_Id")));
}
