use std::convert::Infallible;

use bencher::{benchmark_group, benchmark_main, black_box, Bencher};
use rxsubject::prelude::*;

fn send_to_one(b: &mut Bencher) {
  let subject = Subject::local::<usize, Infallible>();
  let _sub = subject.subscribe(|v| {
    black_box(v);
  });
  b.iter(|| subject.send(black_box(1)));
}

fn send_to_many(b: &mut Bencher) {
  let subject = Subject::local::<String, Infallible>();
  let mut group: SubscriptionGroup = SubscriptionGroup::new();
  for _ in 0..16 {
    subject
      .subscribe(|v: String| {
        black_box(v);
      })
      .store_in(&mut group);
  }
  b.iter(|| subject.send("payload".to_owned()));
}

fn subscribe_and_drop(b: &mut Bencher) {
  let subject = Subject::local::<usize, Infallible>();
  b.iter(|| {
    let sub = subject.subscribe(|_| {});
    black_box(sub.id())
  });
}

fn shared_send_to_many(b: &mut Bencher) {
  let subject = Subject::shared::<usize, Infallible>();
  let mut group = SubscriptionGroup::<BoxedSubscriptionSend>::new();
  for _ in 0..16 {
    subject
      .subscribe(|v| {
        black_box(v);
      })
      .store_in(&mut group);
  }
  b.iter(|| subject.send(black_box(1)));
}

benchmark_group!(benches, send_to_one, send_to_many, subscribe_and_drop, shared_send_to_many);
benchmark_main!(benches);
