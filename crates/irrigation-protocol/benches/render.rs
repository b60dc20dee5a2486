use criterion::{black_box, criterion_group, criterion_main, Criterion};
use irrigation_protocol::{respond, Reading, Responder, StatusReport};

fn bench_render(c: &mut Criterion) {
    let report = StatusReport {
        indicator: 3,
        valves: [false, true],
        moisture: [
            Reading { value: 512, fresh: true },
            Reading { value: 498, fresh: false },
        ],
        flow: [
            Reading { value: 12, fresh: true },
            Reading { value: 0, fresh: true },
        ],
    };

    c.bench_function("render_status_report", |b| {
        let mut out: Responder = Responder::new();
        b.iter(|| {
            black_box(&report).respond(&mut out);
            let sent = out.ring().len();
            out.advance(sent);
        })
    });

    c.bench_function("render_error_line", |b| {
        let mut out: Responder = Responder::new();
        b.iter(|| {
            respond!(out, "Er%d\r\n", black_box(42u16));
            let sent = out.ring().len();
            out.advance(sent);
        })
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
