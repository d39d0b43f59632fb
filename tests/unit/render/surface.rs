use super::*;

#[test]
fn same_canvas_reuses_pixmaps() {
    let c = Canvas {
        width: 64,
        height: 32,
    };
    let mut s = Surfaces::new(c).unwrap();
    assert!(!s.ensure(c).unwrap());
    assert!(!s.ensure(c).unwrap());
    assert_eq!(
        s.stats(),
        SurfaceStats {
            allocations: 1,
            reuses: 2
        }
    );
    assert_eq!(s.canvas.width(), 64);
    assert_eq!(s.layer.height(), 32);
}

#[test]
fn new_canvas_size_reallocates() {
    let mut s = Surfaces::new(Canvas {
        width: 16,
        height: 16,
    })
    .unwrap();
    let bigger = Canvas {
        width: 20,
        height: 10,
    };
    assert!(s.ensure(bigger).unwrap());
    assert_eq!(s.canvas_size(), bigger);
    assert_eq!((s.canvas.width(), s.canvas.height()), (20, 10));
    assert_eq!(s.stats().allocations, 2);
}

#[test]
fn zero_canvas_is_rejected() {
    assert!(
        Surfaces::new(Canvas {
            width: 0,
            height: 4
        })
        .is_err()
    );
}
