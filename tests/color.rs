mod tests {
    use fractured_light::color::{
        BLACK, Palette, Rgb, WHITE, blend_colors, heat_color, named, parse_hex_color,
        rgb_from_u32, scale_color,
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    #[test]
    fn test_blend_colors() {
        assert_eq!(blend_colors(RED, BLUE, 0), RED);
        assert_eq!(blend_colors(RED, BLUE, 255), BLUE);
        assert_eq!(
            blend_colors(RED, BLUE, 128),
            Rgb {
                r: 127,
                g: 0,
                b: 128
            }
        );
        assert_eq!(blend_colors(WHITE, BLACK, 255), BLACK);
        assert_eq!(blend_colors(WHITE, BLACK, 0), WHITE);
    }

    #[test]
    fn test_scale_color() {
        assert_eq!(scale_color(WHITE, 255), WHITE);
        assert_eq!(scale_color(WHITE, 0), BLACK);
        assert_eq!(
            scale_color(Rgb { r: 255, g: 128, b: 0 }, 128),
            Rgb { r: 128, g: 64, b: 0 }
        );
    }

    #[test]
    fn test_rgb_from_u32() {
        assert_eq!(rgb_from_u32(0xFF8000), Rgb { r: 255, g: 128, b: 0 });
        assert_eq!(named::RED, RED);
        assert_eq!(named::GREEN, Rgb { r: 0, g: 128, b: 0 });
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF8000"), Rgb { r: 255, g: 128, b: 0 });
        assert_eq!(parse_hex_color("#0000ff"), BLUE);
    }

    #[test]
    fn test_parse_hex_color_falls_back_to_white() {
        assert_eq!(parse_hex_color("red"), WHITE);
        assert_eq!(parse_hex_color("#12345"), WHITE);
        assert_eq!(parse_hex_color("#GG0000"), WHITE);
        assert_eq!(parse_hex_color("#+12345"), WHITE);
        assert_eq!(parse_hex_color(""), WHITE);
    }

    #[test]
    fn test_heat_color_ramp() {
        assert_eq!(heat_color(0), BLACK);
        assert_eq!(heat_color(128), Rgb { r: 255, g: 128, b: 0 });
        assert_eq!(heat_color(255), Rgb { r: 255, g: 255, b: 252 });
    }

    #[test]
    fn test_palette_wraps() {
        let palette = Palette::new(&[RED, BLUE, WHITE]);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.color(0), RED);
        assert_eq!(palette.color(5), WHITE);
        assert_eq!(palette.blend(2, 0), WHITE);
        assert_eq!(palette.blend(2, 255), RED);
    }

    #[test]
    fn test_empty_palette_is_black() {
        let palette = Palette::new(&[]);
        assert!(palette.is_empty());
        assert_eq!(palette.color(3), BLACK);
    }

    #[test]
    fn test_palette_truncates() {
        let colors = [RED; 20];
        assert_eq!(Palette::new(&colors).len(), 16);
    }
}
