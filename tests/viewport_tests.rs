use rust_image_view::viewer::Viewport;

#[test]
fn new_viewport_sits_at_origin() {
    let vp = Viewport::new(800, 600);
    assert_eq!((vp.offset_x, vp.offset_y), (0, 0));
    assert_eq!((vp.width, vp.height), (800, 600));
}

#[test]
fn resize_updates_extent_exactly() {
    let mut vp = Viewport::new(800, 600);
    vp.resized(1024, 768);
    assert_eq!(
        vp,
        Viewport {
            offset_x: 0,
            offset_y: 0,
            width: 1024,
            height: 768,
        }
    );
}

#[test]
fn repeated_resizes_keep_offsets_pinned() {
    let mut vp = Viewport::new(640, 480);
    for (w, h) in [(1, 1), (1920, 1080), (300, 900)] {
        vp.resized(w, h);
        assert_eq!((vp.offset_x, vp.offset_y), (0, 0));
        assert_eq!((vp.width, vp.height), (w, h));
    }
}
