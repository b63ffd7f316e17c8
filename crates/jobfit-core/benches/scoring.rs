use std::collections::HashSet;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jobfit_core::engine::{AdaptiveEngine, EngineConfig};
use jobfit_core::model::{Difficulty, Question, QuestionId};
use jobfit_core::scoring::final_skill_score;
use jobfit_core::ItemBank;

fn make_bank(roles: usize, per_tier: u64) -> ItemBank {
    let mut questions = Vec::new();
    let mut id = 0;
    for r in 0..roles {
        for d in 1..=3 {
            for _ in 0..per_tier {
                questions.push(Question {
                    id: QuestionId(id),
                    role: format!("role-{r}"),
                    text: format!("question {id}"),
                    options: vec!["a".into(), "b".into(), "c".into()],
                    correct_answer: "a".into(),
                    difficulty: Difficulty::new(d).unwrap(),
                });
                id += 1;
            }
        }
    }
    ItemBank::new(questions).unwrap()
}

fn bench_final_skill_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("final_skill_score");

    group.bench_function("raw=0", |b| {
        b.iter(|| final_skill_score(black_box(0.0), black_box(10)))
    });

    group.bench_function("raw=34", |b| {
        b.iter(|| final_skill_score(black_box(34.0), black_box(10)))
    });

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let bank = make_bank(20, 200);
    let excluded: HashSet<QuestionId> = (0..50).map(QuestionId).collect();
    let window = Difficulty::MAX.window();

    c.bench_function("item_bank_query_window", |b| {
        b.iter(|| bank.query(black_box("role-0"), &window, &excluded))
    });
}

fn bench_full_assessment(c: &mut Criterion) {
    let bank = Arc::new(make_bank(20, 200));

    c.bench_function("full_assessment_10_questions", |b| {
        b.iter(|| {
            let mut engine = AdaptiveEngine::with_seed(Arc::clone(&bank), EngineConfig::default(), 7);
            let mut raw = 0.0;
            let mut current = engine.start("role-3").unwrap();
            let mut i = 0u32;
            while let Some(q) = current {
                let (next, new_raw) = engine.submit(q.id, i % 2 == 0, raw).unwrap();
                raw = new_raw;
                current = next;
                i += 1;
            }
            black_box(engine.final_skill_score(raw))
        })
    });
}

criterion_group!(
    benches,
    bench_final_skill_score,
    bench_query,
    bench_full_assessment
);
criterion_main!(benches);
