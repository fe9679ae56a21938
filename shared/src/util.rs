//! Small utility functions shared across crates

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC time as an RFC 3339 string (stored form for all timestamps)
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Characters used for the random order-number suffix (no 0/O/1/I ambiguity)
const SUFFIX_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Suffix length: 32^6 values per millisecond, collisions negligible at
/// storefront scale
const SUFFIX_LEN: usize = 6;

/// Generate a human-facing order number.
///
/// Layout: `ORD-<millis since epoch>-<6 random chars>`. The time segment
/// keeps numbers roughly sortable; the random suffix makes them
/// unguessable and collision-free without a uniqueness check round-trip.
/// A unique index on the order table is the backstop.
pub fn order_number() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_CHARS.len());
            SUFFIX_CHARS[idx] as char
        })
        .collect();
    format!("ORD-{}-{}", now_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let n = order_number();
        let parts: Vec<&str> = n.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(
            parts[2]
                .bytes()
                .all(|b| SUFFIX_CHARS.contains(&b))
        );
    }

    #[test]
    fn test_order_numbers_differ() {
        let a = order_number();
        let b = order_number();
        assert_ne!(a, b);
    }

    #[test]
    fn test_now_millis_monotonic_ish() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
    }
}
