use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use ringlist::clist::CList;

const DATA: [i32; 1024] = [0; 1024];

fn from_slice(c: &mut Criterion) {
    c.bench_function("from_slice", |b| b.iter(|| CList::from_slice(&DATA)));
}

fn add_to_end(c: &mut Criterion) {
    c.bench_function("add_to_end", |b| {
        b.iter(|| {
            let mut clist = CList::with_capacity(DATA.len()).unwrap();
            clist.append_iter(DATA)
        })
    });
}

fn insert_at_middle(c: &mut Criterion) {
    c.bench_function("insert_at_middle", |b| {
        let clist = CList::from_slice(&DATA).unwrap();
        b.iter_batched(
            || clist.clone(),
            |mut clist| clist.insert_at_pos(DATA.len() / 2, 1),
            BatchSize::SmallInput,
        )
    });
}

fn get_near_end(c: &mut Criterion) {
    c.bench_function("get_near_end", |b| {
        let clist = CList::from_slice(&DATA).unwrap();
        b.iter(|| clist.get(DATA.len() - 2).copied())
    });
}

fn remove_range(c: &mut Criterion) {
    c.bench_function("remove_range", |b| {
        let clist = CList::from_slice(&DATA).unwrap();
        b.iter_batched(
            || clist.clone(),
            |mut clist| clist.remove_range(1, DATA.len() - 1),
            BatchSize::SmallInput,
        )
    });
}

fn get_sub_list(c: &mut Criterion) {
    c.bench_function("get_sub_list", |b| {
        let clist = CList::from_slice(&DATA).unwrap();
        b.iter(|| clist.get_sub_list(0, DATA.len()))
    });
}

criterion_group!(
    clist,
    from_slice,
    add_to_end,
    insert_at_middle,
    get_near_end,
    remove_range,
    get_sub_list,
);

criterion_main!(clist);
