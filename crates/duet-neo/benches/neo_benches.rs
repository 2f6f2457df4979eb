//! Criterion benchmarks for UTXO-model building and signing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use duet_core::{Fixed8, Hash256};
use duet_keys::address::ScriptHash;
use duet_keys::{CurveProfile, KeyPair};
use duet_neo::address::GAS_ASSET;
use duet_neo::{nep5, sign, CoinSelector, NeoTxBuilder, Utxo};

fn utxos(count: u8) -> Vec<Utxo> {
    (0..count)
        .map(|i| {
            let mut txid = [0u8; 32];
            txid[0] = i;
            Utxo::new(
                Hash256(txid),
                u16::from(i),
                GAS_ASSET,
                Fixed8::from_raw(i64::from(i) * 10_000_000 + 1),
                ScriptHash([i; 20]).to_address(),
            )
        })
        .collect()
}

fn bench_coin_selection(c: &mut Criterion) {
    let set = utxos(200);
    let target = Fixed8::from_units(500).expect("target");
    c.bench_function("neo_coin_selection_200", |b| {
        b.iter(|| CoinSelector::select(black_box(&set), &GAS_ASSET, target))
    });
}

fn bench_sign_transfer(c: &mut Criterion) {
    let set = utxos(20);
    let key = KeyPair::generate(CurveProfile::P256);
    let tx = NeoTxBuilder::new()
        .add_recipient(GAS_ASSET, ScriptHash([9; 20]).to_address(), Fixed8::ONE)
        .build_transfer(&set)
        .expect("transfer");
    c.bench_function("neo_sign_transfer", |b| {
        b.iter(|| sign::sign(black_box(tx.clone()), &key))
    });
}

fn bench_nep5_script(c: &mut Criterion) {
    let contract = ScriptHash([0xec; 20]);
    let from = ScriptHash([1; 20]);
    let to = ScriptHash([2; 20]);
    c.bench_function("neo_nep5_transfer_script", |b| {
        b.iter(|| nep5::transfer(&contract, &from, &to, black_box(123_456_789)))
    });
}

criterion_group!(benches, bench_coin_selection, bench_sign_transfer, bench_nep5_script);
criterion_main!(benches);
