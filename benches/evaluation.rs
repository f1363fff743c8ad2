use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use school_core::fees::{summarize_collection, Payment, PaymentMethod};
use school_core::grading::{class_standings, evaluate, ScoreComponents};
use school_core::records::{fixtures::demo_records, SchoolRecords, ScoreRecord, Student, Term};
use school_core::storage::json_backend::{load_records_from_path, save_records_to_path};
use tempfile::tempdir;

const SUBJECTS: [&str; 8] = [
    "Mathematics",
    "English Language",
    "Basic Science",
    "Civic Education",
    "Agriculture",
    "French",
    "Computer Studies",
    "Social Studies",
];

fn build_large_records(students: usize) -> SchoolRecords {
    let mut records = demo_records();
    let enrolled = NaiveDate::from_ymd_opt(2024, 9, 9).unwrap();
    for idx in 0..students {
        let id = records.next_student_id();
        records.students.push(Student {
            id: id.clone(),
            name: format!("Student {}", idx),
            class_id: "JSS1".into(),
            branch_id: "BR-0001".into(),
            guardian: None,
            enrolled_on: enrolled,
        });
        for (offset, subject) in SUBJECTS.iter().enumerate() {
            let seed = (idx * 7 + offset * 13) as i64;
            records.scores.push(ScoreRecord::new(
                &id,
                *subject,
                Term::First,
                ScoreComponents::clamped(seed % 11, (seed / 3) % 11, seed % 21, seed % 61),
            ));
        }
        if idx % 2 == 0 {
            records.payments.push(
                Payment::new(&id, 5_000_000, PaymentMethod::Transfer, enrolled).unwrap(),
            );
        }
    }
    records
}

fn bench_grading(c: &mut Criterion) {
    c.bench_function("evaluate_all_component_mixes", |b| {
        b.iter(|| {
            for exam in 0..=60 {
                black_box(evaluate(ScoreComponents::clamped(
                    black_box(7),
                    black_box(8),
                    black_box(15),
                    exam,
                )));
            }
        })
    });

    let records = build_large_records(500);
    c.bench_function("class_standings_500", |b| {
        b.iter(|| black_box(class_standings(&records, "JSS1", "BR-0001", Term::First)))
    });
}

fn bench_fees(c: &mut Criterion) {
    let records = build_large_records(2_000);
    c.bench_function("collection_summary_2k", |b| {
        b.iter(|| {
            let ledgers: Vec<_> = records
                .students
                .iter()
                .map(|student| records.ledger(student))
                .collect();
            black_box(summarize_collection(&ledgers))
        })
    });
}

fn bench_store_io(c: &mut Criterion) {
    let records = build_large_records(2_000);
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("records.json");

    c.bench_function("records_save_2k", |b| {
        b.iter(|| save_records_to_path(&records, &path).expect("save records"))
    });

    save_records_to_path(&records, &path).expect("seed");
    c.bench_function("records_load_2k", |b| {
        b.iter(|| black_box(load_records_from_path(&path).expect("load records")))
    });
}

criterion_group!(benches, bench_grading, bench_fees, bench_store_io);
criterion_main!(benches);
