//! Fair topic → question-slot assignment.

use rand::seq::SliceRandom;
use rand::Rng;

/// Joins several topics that share one slot.
pub const SLOT_JOINER: &str = " and ";

/// Produce exactly `count` slot labels from `topics` (empty only when `topics` is empty).
///
/// Topics are shuffled first so repeated calls don't pin the same topic to the same slot.
/// Fewer topics than slots: round-robin repetition. More topics than slots: topic `i`
/// goes to bucket `i % count` and each bucket is joined with [`SLOT_JOINER`].
/// Every input topic shows up in at least one slot.
pub fn distribute<R, S>(rng: &mut R, topics: &[S], count: usize) -> Vec<String>
where
  R: Rng + ?Sized,
  S: AsRef<str>,
{
  if topics.is_empty() || count == 0 {
    return Vec::new();
  }

  let mut shuffled: Vec<&str> = topics.iter().map(|t| t.as_ref()).collect();
  shuffled.shuffle(rng);

  if shuffled.len() <= count {
    return shuffled
      .iter()
      .cycle()
      .take(count)
      .map(|t| t.to_string())
      .collect();
  }

  let mut buckets: Vec<Vec<&str>> = vec![Vec::new(); count];
  for (i, topic) in shuffled.into_iter().enumerate() {
    buckets[i % count].push(topic);
  }
  buckets.into_iter().map(|b| b.join(SLOT_JOINER)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn covers_every_topic(slots: &[String], topics: &[&str]) -> bool {
    topics
      .iter()
      .all(|t| slots.iter().any(|s| s.split(SLOT_JOINER).any(|part| part == *t)))
  }

  #[test]
  fn fewer_topics_than_slots_repeats_round_robin() {
    let mut rng = StdRng::seed_from_u64(11);
    let topics = ["React", "CSS"];
    let slots = distribute(&mut rng, &topics, 5);

    assert_eq!(slots.len(), 5);
    assert!(covers_every_topic(&slots, &topics));
    // Round-robin: a two-topic cycle alternates.
    for pair in slots.windows(2) {
      assert_ne!(pair[0], pair[1]);
    }
  }

  #[test]
  fn more_topics_than_slots_groups_them() {
    let mut rng = StdRng::seed_from_u64(3);
    let topics = ["React", "CSS", "Docker", "Redis", "Kafka"];
    let slots = distribute(&mut rng, &topics, 2);

    assert_eq!(slots.len(), 2);
    assert!(covers_every_topic(&slots, &topics));
    let parts: Vec<usize> = slots.iter().map(|s| s.split(SLOT_JOINER).count()).collect();
    assert_eq!(parts.iter().sum::<usize>(), 5);
    assert!(parts.contains(&3) && parts.contains(&2));
  }

  #[test]
  fn length_and_coverage_hold_across_shapes() {
    let topics = ["A1", "B2", "C3", "D4", "E5", "F6", "G7"];
    for seed in 0..20u64 {
      let mut rng = StdRng::seed_from_u64(seed);
      for n in 1..=topics.len() {
        for count in 1..=10 {
          let slots = distribute(&mut rng, &topics[..n], count);
          assert_eq!(slots.len(), count);
          assert!(covers_every_topic(&slots, &topics[..n]));
        }
      }
    }
  }

  #[test]
  fn equal_sizes_use_each_topic_once() {
    let mut rng = StdRng::seed_from_u64(5);
    let topics = ["Kafka", "Spark", "Flink"];
    let mut slots = distribute(&mut rng, &topics, 3);
    slots.sort();
    assert_eq!(slots, vec!["Flink", "Kafka", "Spark"]);
  }

  #[test]
  fn degenerate_inputs_produce_empty_output() {
    let mut rng = StdRng::seed_from_u64(1);
    let none: [&str; 0] = [];
    assert!(distribute(&mut rng, &none, 4).is_empty());
    assert!(distribute(&mut rng, &["React"], 0).is_empty());
  }
}
