//! Image URL resolution tests

use hitomi::image::{referer, resolve_image};
use hitomi::{Error, Image};

mod common;
use common::hash_ending;

#[cfg(test)]
mod image_tests {
    use super::*;

    #[test]
    fn test_resolution_is_pure() {
        let hash = hash_ending("0f5c1");
        let first = resolve_image(42, &hash, "001.jpg").unwrap();
        for _ in 0..10 {
            assert_eq!(resolve_image(42, &hash, "001.jpg").unwrap(), first);
        }
    }

    #[test]
    fn test_three_frontends() {
        // 0x5c = 92 >= 0x30: three frontends, 92 % 3 = 2
        let hash = hash_ending("5c1");
        let (url, filename) = resolve_image(42, &hash, "001.jpg").unwrap();
        assert_eq!(url, format!("https://cb.hitomi.la/images/1/5c/{}.jpg", hash));
        assert_eq!(filename, "001.jpg");

        // 0x30 = 48: first value with three frontends, 48 % 3 = 0
        let hash = hash_ending("30a");
        let (url, _) = resolve_image(42, &hash, "x.png").unwrap();
        assert!(url.starts_with("https://ab.hitomi.la/images/a/30/"), "{}", url);
    }

    #[test]
    fn test_two_frontends() {
        // 0x2f = 47 < 0x30: two frontends, 47 % 2 = 1
        let hash = hash_ending("2f0");
        let (url, _) = resolve_image(42, &hash, "x.png").unwrap();
        assert!(url.starts_with("https://bb.hitomi.la/images/0/2f/"), "{}", url);

        // 0x0a = 10: 10 % 2 = 0
        let hash = hash_ending("0a0");
        let (url, _) = resolve_image(42, &hash, "x.png").unwrap();
        assert!(url.starts_with("https://ab.hitomi.la/"), "{}", url);
    }

    #[test]
    fn test_values_below_nine_pin_to_one() {
        // Without the pin, 0x00, 0x02, 0x04, 0x06, 0x08 would land on "ab"
        for b in ["00", "01", "02", "04", "06", "08"] {
            let hash = hash_ending(&format!("{}e", b));
            let (url, _) = resolve_image(42, &hash, "x.webp").unwrap();
            assert!(url.starts_with("https://bb.hitomi.la/"), "{}: {}", b, url);
        }
    }

    #[test]
    fn test_non_hex_shard_digits() {
        let hash = hash_ending("zz1");
        assert!(matches!(
            resolve_image(42, &hash, "x.jpg"),
            Err(Error::InvalidHash(_))
        ));
        assert!(matches!(
            Image::new(42, hash_ending("+f1"), "x.jpg"),
            Err(Error::InvalidHash(_))
        ));
    }

    #[test]
    fn test_image_record() {
        let image = Image::new(7, hash_ending("5c1"), "001.avif").unwrap();
        assert_eq!(image.galleryid, 7);
        assert_eq!(image.name, "001.avif");
        assert!(image.image_url.ends_with("5c1.avif"));
        assert_eq!(image.referer(), referer(7));
        assert_eq!(image.referer(), "https://hitomi.la/reader/7.html");
    }
}
