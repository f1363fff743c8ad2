use school_core::grading::{
    band_for, evaluate, report_card, PromotionStatus, ScoreComponents, GRADING_TABLE, MAX_TOTAL,
};
use school_core::records::{fixtures::demo_records, ScoreRecord, Term};

#[test]
fn every_total_maps_to_exactly_one_band() {
    for total in 0..=MAX_TOTAL {
        let matching = GRADING_TABLE
            .iter()
            .filter(|band| band.contains(total))
            .count();
        assert_eq!(matching, 1, "total {total}");
        assert!(band_for(total).is_ok());
    }
    assert!(band_for(MAX_TOTAL + 1).is_err());
}

#[test]
fn valid_components_sum_to_their_total() {
    for test1 in [0, 4, 10] {
        for assignment in [0, 13, 20] {
            for exam in [0, 39, 60] {
                let components = ScoreComponents::clamped(test1, 7, assignment, exam);
                let evaluated = evaluate(components);
                assert_eq!(evaluated.total as i64, test1 + 7 + assignment + exam);
                assert!(evaluated.total <= MAX_TOTAL);
                assert_eq!(evaluated, evaluate(components));
            }
        }
    }
}

#[test]
fn scenario_totals_land_in_expected_bands() {
    let cases = [
        ((10, 10, 20, 55), 95, "A1", "Excellent"),
        ((5, 5, 10, 24), 44, "E8", "Pass"),
        ((5, 5, 10, 23), 43, "E8", "Pass"),
        ((5, 5, 10, 19), 39, "F9", "Fail"),
    ];
    for ((t1, t2, asg, exam), total, grade, remark) in cases {
        let evaluated = evaluate(ScoreComponents::clamped(t1, t2, asg, exam));
        assert_eq!(evaluated.total, total);
        assert_eq!(evaluated.grade, grade);
        assert_eq!(evaluated.remark, remark);
    }
}

#[test]
fn out_of_range_entries_clamp_before_grading() {
    let over = evaluate(ScoreComponents::clamped(15, 10, 20, 55));
    let capped = evaluate(ScoreComponents::clamped(10, 10, 20, 55));
    assert_eq!(over, capped);
    let negative = evaluate(ScoreComponents::clamped(-3, 0, 0, 0));
    assert_eq!(negative.total, 0);
    assert_eq!(negative.grade, "F9");
}

#[test]
fn report_card_reflects_new_scores_immediately() {
    let mut records = demo_records();
    let before = report_card(&records, "STU-0003", Term::First).unwrap();
    assert_eq!(before.promotion, PromotionStatus::Repeat);

    records.upsert_score(ScoreRecord::new(
        "STU-0003",
        "Mathematics",
        Term::First,
        ScoreComponents::clamped(10, 10, 20, 60),
    ));
    let after = report_card(&records, "STU-0003", Term::First).unwrap();
    assert_eq!(after.grand_total, 144);
    assert_eq!(after.promotion, PromotionStatus::Promoted);
    assert_eq!(after.lines.len(), 2);
}

#[test]
fn term_without_scores_has_no_results() {
    let records = demo_records();
    let card = report_card(&records, "STU-0001", Term::Third).unwrap();
    assert!(card.lines.is_empty());
    assert_eq!(card.position, None);
    assert_eq!(card.promotion, PromotionStatus::NoResults);
}
