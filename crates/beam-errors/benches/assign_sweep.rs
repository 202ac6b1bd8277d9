use beam_core::{Element, ElementSelector, Lattice};
use beam_errors::{assign_errors, enable_errors, AssignOptions, EnableFlags, ErrorTable};
use criterion::{criterion_group, criterion_main, Criterion};

fn synthetic_ring(cells: usize) -> Lattice {
    let mut elements = Vec::with_capacity(cells * 4);
    for cell in 0..cells {
        elements.push(Element::monitor(format!("BPM_{cell:03}")));
        elements.push(Element::quadrupole(format!("QF_{cell:03}"), 0.3, 1.2));
        elements.push(Element::drift(format!("DR_{cell:03}"), 1.5));
        elements.push(Element::quadrupole(format!("QD_{cell:03}"), 0.3, -1.2));
    }
    Lattice::new("bench", 6.0e9, elements)
}

fn bench_assign_enable(c: &mut Criterion) {
    let table = ErrorTable::new()
        .bpm_gain(([1.0, 1.0], 1.0e-2))
        .bpm_offset(1.0e-4)
        .shift_err(2.0e-4)
        .rotation_err(1.0e-4)
        .polynom_b_err(vec![0.0, 1.0e-3]);
    let options = AssignOptions {
        truncation: Some(2.5),
        seed: 99,
    };

    let mut group = c.benchmark_group("assign_sweep");
    group.bench_function("assign_64_cells", |b| {
        b.iter(|| {
            let mut ring = synthetic_ring(64);
            assign_errors(&mut ring, &ElementSelector::All, &table, &options).unwrap();
        })
    });
    group.bench_function("enable_64_cells", |b| {
        let mut ring = synthetic_ring(64);
        assign_errors(&mut ring, &ElementSelector::All, &table, &options).unwrap();
        b.iter(|| {
            let _ = enable_errors(&ring, &EnableFlags::default());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_assign_enable);
criterion_main!(benches);
