// Unit tests for domain models

use super::*;

#[test]
fn test_time_spec_parse_seconds() {
    assert_eq!(TimeSpec::parse("90").unwrap().as_seconds(), 90.0);
    assert_eq!(TimeSpec::parse("12.5").unwrap().as_seconds(), 12.5);
    assert_eq!(TimeSpec::parse("  7 ").unwrap().as_seconds(), 7.0);
}

#[test]
fn test_time_spec_parse_mm_ss() {
    assert_eq!(TimeSpec::parse("1:30").unwrap().as_seconds(), 90.0);
    assert_eq!(TimeSpec::parse("0:30.5").unwrap().as_seconds(), 30.5);
    assert_eq!(TimeSpec::parse("2:05").unwrap().as_seconds(), 125.0);
}

#[test]
fn test_time_spec_parse_hh_mm_ss() {
    assert_eq!(TimeSpec::parse("1:01:30").unwrap().as_seconds(), 3690.0);
    assert_eq!(TimeSpec::parse("0:00:01.25").unwrap().as_seconds(), 1.25);
}

#[test]
fn test_time_spec_parse_invalid() {
    for text in ["1:2:3:4", "abc", "", "   ", "-10", "1.5:30", "a:10", "1:xx", "inf", "NaN"] {
        let err = TimeSpec::parse(text).unwrap_err();
        assert!(
            matches!(err, FormatError::Time { .. }),
            "expected time format error for {:?}",
            text
        );
    }
}

#[test]
fn test_time_spec_format_clock() {
    assert_eq!(TimeSpec::from_seconds(90.0).format_clock(), "1:30.00");
    assert_eq!(TimeSpec::from_seconds(5.5).format_clock(), "0:05.50");
    assert_eq!(TimeSpec::from_seconds(3690.25).format_clock(), "61:30.25");
    assert_eq!(format!("{}", TimeSpec::from_seconds(0.0)), "0:00.00");
}

#[test]
fn test_aspect_ratio_parse_original_any_case() {
    assert_eq!(AspectRatio::parse("original").unwrap(), AspectRatio::Original);
    assert_eq!(AspectRatio::parse("ORIGINAL").unwrap(), AspectRatio::Original);
    assert_eq!(AspectRatio::parse("Original").unwrap(), AspectRatio::Original);
}

#[test]
fn test_aspect_ratio_parse_pair() {
    assert_eq!(
        AspectRatio::parse("16:9").unwrap(),
        AspectRatio::Ratio {
            width: 16.0,
            height: 9.0
        }
    );
    assert_eq!(AspectRatio::parse("2.39:1").unwrap().value(), Some(2.39));
}

#[test]
fn test_aspect_ratio_parse_invalid() {
    for text in ["16-9", "16:", ":9", "0:9", "16:0", "-1:1", "a:b", "1:2:3", ""] {
        let err = AspectRatio::parse(text).unwrap_err();
        assert!(
            matches!(err, FormatError::Ratio { .. }),
            "expected ratio format error for {:?}",
            text
        );
    }
}

#[test]
fn test_dimensions_reject_zero() {
    assert!(Dimensions::new(0, 1080).is_none());
    assert!(Dimensions::new(1920, 0).is_none());
    let dims = Dimensions::new(1920, 1080).unwrap();
    assert_eq!(dims.to_string(), "1920x1080");
}

#[test]
fn test_crop_geometry_filter() {
    let crop = CropGeometry {
        width: 606,
        height: 1080,
        x: 656,
        y: 0,
    };
    assert_eq!(crop.to_filter(), "crop=606:1080:656:0");
    assert!(!crop.is_degenerate());
    assert!(crop.fits_within(&Dimensions::new(1920, 1080).unwrap()));
    assert!(!crop.fits_within(&Dimensions::new(1000, 1080).unwrap()));
}

#[test]
fn test_segment_outcome_accessors() {
    let ok = SegmentOutcome::success(2, "/tmp/out/video_part_02.mp4");
    let failed = SegmentOutcome::failure(1, "timeout");

    assert!(ok.is_success());
    assert_eq!(ok.index(), 2);
    assert!(!failed.is_success());
    assert_eq!(failed.index(), 1);

    if let SegmentOutcome::Success(success) = ok {
        assert_eq!(success.file_name(), Some("video_part_02.mp4"));
    }
}

#[test]
fn test_segment_plan_end() {
    let plan = SegmentPlan {
        index: 1,
        start: TimeSpec::from_seconds(50.0),
        duration: TimeSpec::from_seconds(25.5),
        ratio: AspectRatio::Original,
        crop: CropSpec::Keep,
        end_clamped: false,
    };
    assert_eq!(plan.end().as_seconds(), 75.5);
}
