use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tutorgrade_core::{Evaluator, Question, ReferenceAnswer, UserAnswer};

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let evaluator = Evaluator::default();

    let question = Question::new("What is underwriting?")
        .with_topic("Underwriting")
        .with_subject("Insurance");
    let reference = ReferenceAnswer::new(
        "Underwriting is the process insurers use to evaluate risk and decide whether to \
         issue a policy.",
    );

    group.bench_function("paraphrase", |b| {
        let answer = UserAnswer::new(
            "it's how insurers decide if they should give you a policy by looking at risk",
        );
        b.iter(|| evaluator.evaluate(black_box(&question), black_box(&reference), black_box(&answer)))
    });

    group.bench_function("unrelated", |b| {
        let answer = UserAnswer::new("bananas are a good source of potassium");
        b.iter(|| evaluator.evaluate(black_box(&question), black_box(&reference), black_box(&answer)))
    });

    group.bench_function("multi_clause", |b| {
        let question = Question::new("What is a deductible?").with_topic("Deductibles");
        let reference = ReferenceAnswer::new(
            "A deductible is the amount you pay before insurance pays; higher deductibles \
             lower premiums; it applies per claim.",
        );
        let answer = UserAnswer::new("you pay the deductible amount first before the insurer pays");
        b.iter(|| evaluator.evaluate(black_box(&question), black_box(&reference), black_box(&answer)))
    });

    group.bench_function("placeholder_reference", |b| {
        let question = Question::new("What is Risk Management?")
            .with_topic("Risk Management")
            .with_subject("Insurance");
        let reference = ReferenceAnswer::new(
            "Risk Management is an important concept in Insurance. Understanding the key \
             principles of Risk Management helps you apply it in real situations.",
        );
        let answer = UserAnswer::new("you identify, assess, mitigate and transfer risk");
        b.iter(|| evaluator.evaluate(black_box(&question), black_box(&reference), black_box(&answer)))
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
