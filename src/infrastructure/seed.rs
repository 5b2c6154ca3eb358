//! Mock data for demos and load checks
//!
//! Events are scattered around Japanese cities, so low zooms produce dense
//! clusters and high zooms spread them back out.

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entities::EmotionEvent;
use crate::domain::value_objects::{EmotionCategory, EventId, GeoPoint, Intensity};

/// Max offset from a base city, in degrees (roughly 22 km)
const SCATTER_DEGREES: f64 = 0.2;

const CITIES: &[(f64, f64, &str)] = &[
    (43.0642, 141.3469, "札幌市"),
    (41.7687, 140.7268, "函館市"),
    (43.7703, 142.3650, "旭川市"),
    (40.8244, 140.7400, "青森市"),
    (39.7186, 141.1527, "盛岡市"),
    (38.2682, 140.8694, "仙台市"),
    (38.2404, 140.3633, "山形市"),
    (37.7503, 140.4676, "福島市"),
    (36.3418, 140.4468, "つくば市"),
    (36.3657, 139.4489, "前橋市"),
    (36.5658, 139.8836, "宇都宮市"),
    (35.8617, 139.6455, "さいたま市"),
    (35.6047, 140.1233, "千葉市"),
    (35.6762, 139.6503, "東京都"),
    (35.4478, 139.6425, "横浜市"),
    (35.5272, 139.7025, "川崎市"),
    (37.9026, 139.0232, "新潟市"),
    (36.6952, 137.2114, "富山市"),
    (36.5613, 136.6562, "金沢市"),
    (36.6513, 138.1810, "長野市"),
    (35.1815, 136.9066, "名古屋市"),
    (34.9770, 138.3828, "静岡市"),
    (34.7056, 137.7346, "浜松市"),
    (35.0116, 135.7681, "京都市"),
    (34.6937, 135.5023, "大阪市"),
    (34.6913, 135.1830, "神戸市"),
    (34.6851, 135.8278, "奈良市"),
    (34.2261, 135.1675, "和歌山市"),
    (35.4437, 133.0505, "松江市"),
    (34.6618, 133.9197, "岡山市"),
    (34.3963, 132.4596, "広島市"),
    (34.0658, 134.5594, "徳島市"),
    (34.3401, 134.0434, "高松市"),
    (33.8416, 132.7657, "松山市"),
    (33.5597, 133.5311, "高知市"),
    (33.5904, 130.4017, "福岡市"),
    (32.7503, 129.8777, "長崎市"),
    (32.7898, 130.7417, "熊本市"),
    (31.5966, 130.5571, "鹿児島市"),
    (26.2124, 127.6809, "那覇市"),
];

const GIVEN_NAMES: &[&str] = &[
    "太郎", "次郎", "花子", "美咲", "翔太", "健太", "愛", "結衣", "陽菜", "大輔", "拓也", "直樹",
    "智子", "由美", "蓮", "悠", "葵", "咲", "凛", "楓",
];

const FAMILY_NAMES: &[&str] = &[
    "佐藤", "鈴木", "高橋", "田中", "渡辺", "伊藤", "山本", "中村", "小林", "加藤", "吉田", "山田",
    "佐々木", "山口", "松本", "井上", "木村", "林", "清水", "森",
];

/// Generate `count` random events observed within the last 24 hours
pub fn generate_mock_events<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<EmotionEvent> {
    let now = Utc::now();
    (0..count)
        .filter_map(|_| {
            let &(lat, lng, city) = CITIES.choose(rng)?;
            let lat = round4(lat + rng.gen_range(-SCATTER_DEGREES..SCATTER_DEGREES));
            let lng = round4(lng + rng.gen_range(-SCATTER_DEGREES..SCATTER_DEGREES));
            let point = GeoPoint::new(lat, lng).ok()?;
            let category = *EmotionCategory::ALL.choose(rng)?;
            let intensity = Intensity::new(rng.gen_range(0..100)).ok()?;
            let observed_at = now - Duration::milliseconds(rng.gen_range(0..86_400_000));
            let author = format!("{} {}", FAMILY_NAMES.choose(rng)?, GIVEN_NAMES.choose(rng)?);

            Some(
                EmotionEvent::new(point, category, intensity)
                    .with_id(EventId::generate())
                    .with_place_name(format!("{city}周辺"))
                    .with_author(author)
                    .with_observed_at(observed_at),
            )
        })
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generates_requested_count_near_cities() {
        let mut rng = StdRng::seed_from_u64(7);
        let events = generate_mock_events(200, &mut rng);
        assert_eq!(events.len(), 200);

        let now = Utc::now();
        for event in &events {
            let near_city = CITIES.iter().any(|&(lat, lng, _)| {
                (event.point.latitude() - lat).abs() <= SCATTER_DEGREES + 1e-4
                    && (event.point.longitude() - lng).abs() <= SCATTER_DEGREES + 1e-4
            });
            assert!(near_city);
            assert!(event.intensity.value() < 100);
            assert!(event.observed_at <= now);
            assert!(event.observed_at > now - Duration::hours(25));
            assert!(event.place_name.ends_with("周辺"));
            assert!(!event.author.is_empty());
        }
    }

    #[test]
    fn test_coordinates_have_four_decimals() {
        let mut rng = StdRng::seed_from_u64(11);
        for event in generate_mock_events(50, &mut rng) {
            assert_eq!(round4(event.point.latitude()), event.point.latitude());
            assert_eq!(round4(event.point.longitude()), event.point.longitude());
        }
    }

    #[test]
    fn test_seeded_events_cluster_at_low_zoom() {
        use crate::domain::services::GridClusterer;
        use crate::domain::value_objects::ZoomLevel;

        let mut rng = StdRng::seed_from_u64(3);
        let events = generate_mock_events(500, &mut rng);
        let result = GridClusterer::default().partition(&events, ZoomLevel::new(4));
        assert!(!result.clusters.is_empty());
        assert_eq!(result.event_count(), 500);
    }
}
