// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Criterion benchmarks for pq-picnic3 keygen, sign, and verify.

use criterion::{criterion_group, criterion_main, Criterion};
use pq_picnic3::{KeyPair, Picnic3L1, Picnic3L3, Picnic3L5, PicnicParameter};
use signature::{Signer, Verifier};

fn bench_keygen<P: PicnicParameter>(c: &mut Criterion) {
    c.bench_function(&format!("{}/keygen", P::NAME), |b| {
        let mut rng = rand::rng();
        b.iter(|| KeyPair::<P>::generate(&mut rng).expect("keygen"));
    });
}

fn bench_sign<P: PicnicParameter>(c: &mut Criterion) {
    let mut rng = rand::rng();
    let keypair = KeyPair::<P>::generate(&mut rng).expect("keygen");
    let msg = b"benchmark message for signing";

    c.bench_function(&format!("{}/sign", P::NAME), |b| {
        b.iter(|| keypair.signing_key().try_sign(msg).expect("sign"));
    });
}

fn bench_verify<P: PicnicParameter>(c: &mut Criterion) {
    let mut rng = rand::rng();
    let keypair = KeyPair::<P>::generate(&mut rng).expect("keygen");
    let msg = b"benchmark message for verify";
    let sig = keypair.signing_key().try_sign(msg).expect("sign");

    c.bench_function(&format!("{}/verify", P::NAME), |b| {
        b.iter(|| keypair.verifying_key().verify(msg, &sig).expect("verify"));
    });
}

fn picnic3_l1_benches(c: &mut Criterion) {
    bench_keygen::<Picnic3L1>(c);
    bench_sign::<Picnic3L1>(c);
    bench_verify::<Picnic3L1>(c);
}

fn picnic3_l3_benches(c: &mut Criterion) {
    bench_keygen::<Picnic3L3>(c);
    bench_sign::<Picnic3L3>(c);
    bench_verify::<Picnic3L3>(c);
}

fn picnic3_l5_benches(c: &mut Criterion) {
    bench_keygen::<Picnic3L5>(c);
    bench_sign::<Picnic3L5>(c);
    bench_verify::<Picnic3L5>(c);
}

criterion_group!(
    benches,
    picnic3_l1_benches,
    picnic3_l3_benches,
    picnic3_l5_benches
);
criterion_main!(benches);
