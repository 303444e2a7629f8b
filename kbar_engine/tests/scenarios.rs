mod common;
use common::{at_min, flat, ohlc};

use kbar_engine::aggregator::{BarAggregator, Ingest};
use kbar_engine::{WarmUpBoundary, moving_average, rsi};

#[test]
fn five_minutes_in_one_bucket() {
    let closes = [10.0, 11.0, 9.0, 12.0, 12.0];
    let volumes = [3.0, 1.0, 4.0, 1.0, 5.0];
    let mut agg = BarAggregator::new(at_min(0), 5).unwrap();

    for (i, (&c, &v)) in closes.iter().zip(&volumes).enumerate() {
        let tag = agg.add_observation(&flat(i as i64, c, v)).unwrap();
        assert!(!tag.closed_prior_bar());
    }
    assert!(agg.closed_bars().is_empty());
    agg.finalize();

    let bars = agg.closed_bars();
    assert_eq!(bars.len(), 1);
    let bar = &bars[0];
    assert_eq!(bar.bucket_start, at_min(0));
    assert_eq!(bar.open, 10.0);
    assert_eq!(bar.high, 12.0);
    assert_eq!(bar.low, 9.0);
    assert_eq!(bar.close, 12.0);
    assert_eq!(bar.volume, volumes.iter().sum::<f64>());
    assert_eq!(bar.observation_count, 5);
}

#[test]
fn observation_at_next_boundary_closes_the_first_bar() {
    let mut agg = BarAggregator::new(at_min(0), 5).unwrap();
    for (i, c) in [10.0, 11.0, 9.0, 12.0].into_iter().enumerate() {
        agg.add_observation(&flat(i as i64, c, 1.0)).unwrap();
    }

    let tag = agg.add_observation(&flat(5, 12.0, 2.0)).unwrap();
    assert_eq!(tag, Ingest::Closed);
    assert_eq!(agg.closed_bars().len(), 1);
    assert_eq!(agg.closed_bars()[0].close, 12.0);
    assert_eq!(agg.closed_bars()[0].volume, 4.0);

    agg.finalize();
    let bars = agg.closed_bars();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[1].bucket_start, at_min(5));
    assert_eq!(bars[1].volume, 2.0);
}

#[test]
fn moving_average_over_five_bars() {
    let mut agg = BarAggregator::new(at_min(0), 1).unwrap();
    for (i, c) in [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().enumerate() {
        agg.add_observation(&flat(i as i64, c, 1.0)).unwrap();
    }
    agg.finalize();

    let ma = moving_average(agg.closed_bars(), 3).unwrap();
    assert_eq!(ma.values(), &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    assert_eq!(ma.warm_up_index(), 2);
    assert_eq!(ma.warm_up_boundary(), WarmUpBoundary::LastUndefined(1));
}

#[test]
fn indicators_accept_raw_observations() {
    let obs: Vec<_> = [1.0, 2.0, 3.0, 4.0]
        .into_iter()
        .enumerate()
        .map(|(i, c)| flat(i as i64, c, 1.0))
        .collect();
    let r = rsi(&obs, 3).unwrap();
    assert_eq!(r.get(3), Some(100.0));
}

#[test]
fn degenerate_buckets_are_valid() {
    let mut agg = BarAggregator::new(at_min(0), 5).unwrap();
    agg.add_observation(&ohlc(0, 10.0, 10.5, 9.5, 10.2, 0.0)).unwrap();
    agg.add_observation(&flat(30, 11.0, 0.0)).unwrap();
    agg.finalize();

    let bars = agg.closed_bars();
    assert_eq!(bars.len(), 2, "empty buckets in between are not materialised");
    assert_eq!(bars[0].volume, 0.0);
    assert_eq!((bars[0].open, bars[0].high, bars[0].low, bars[0].close), (10.0, 10.5, 9.5, 10.2));
    assert_eq!(bars[1].bucket_start, at_min(30));
}
