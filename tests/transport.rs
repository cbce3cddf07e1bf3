use lightfield_transport::{
    AngularBasis, AngularPlane, Optics1D, Parameterisation, PlaneGeometry, Transport,
    TransportError,
};

fn two_view_angular(basis: AngularBasis) -> AngularPlane {
    let mut angular = AngularPlane::default();
    angular
        .setup(
            0.05,
            0.05,
            basis,
            Parameterisation::Spatial,
            &[-0.1, 0.1],
            &[0.0, 0.0],
            &[0.5, 0.5],
        )
        .unwrap();
    angular
}

#[test]
fn forward_and_backward_views_satisfy_the_adjoint_property() {
    let src_plane = PlaneGeometry::new(10, 10, 0.1, 0.1);
    let dst_plane = PlaneGeometry::new(10, 10, 0.1, 0.1);
    let identity = Optics1D::identity();
    let propagation = Optics1D::translation(0.5);
    let angular = two_view_angular(AngularBasis::Dirac);

    let transport = Transport::new(
        &src_plane,
        &dst_plane,
        &angular,
        &identity,
        &identity,
        &propagation,
        &propagation,
    )
    .unwrap();

    let u: Vec<f64> = (0..src_plane.len()).map(|i| ((i * 11 + 3) as f64).sin()).collect();
    let v: Vec<f64> = (0..dst_plane.len()).map(|i| ((i * 5 + 1) as f64).cos()).collect();
    let mut tmp = vec![0f64; transport.tmp_size()];

    for view in 0..angular.num_points() {
        let mut forward = vec![0f64; dst_plane.len()];
        transport.forw_view(view, &u, &mut forward, &mut tmp).unwrap();

        let mut backward = vec![0f64; src_plane.len()];
        transport.back_view(view, &v, &mut backward, &mut tmp).unwrap();

        let lhs: f64 = forward.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
        let rhs: f64 = u.iter().zip(backward.iter()).map(|(a, b)| a * b).sum();
        assert!(
            (lhs - rhs).abs() < 1e-6 * (lhs.abs() + rhs.abs() + 1.),
            "view {view}: {lhs} != {rhs}"
        );
    }
}

#[test]
fn pillbox_basis_produces_a_smoothed_nonnegative_response() {
    let plane = PlaneGeometry::new(12, 12, 0.1, 0.1);
    let identity = Optics1D::identity();
    let angular = two_view_angular(AngularBasis::Pillbox);

    let transport =
        Transport::new(&plane, &plane, &angular, &identity, &identity, &identity, &identity)
            .unwrap();
    let mut src = vec![0f64; plane.len()];
    src[plane.len() / 2] = 1.;
    let mut dst = vec![0f64; plane.len()];
    let mut tmp = vec![0f64; transport.tmp_size()];
    transport.forw_view(0, &src, &mut dst, &mut tmp).unwrap();

    assert!(dst.iter().all(|&x| x >= 0.));
    assert!(dst.iter().filter(|&&x| x > 0.).count() > 1);
}

#[test]
fn resetup_is_idempotent_given_unchanged_inputs() {
    let plane = PlaneGeometry::new(6, 6, 0.1, 0.1);
    let identity = Optics1D::identity();
    let angular = two_view_angular(AngularBasis::Dirac);
    let mut transport =
        Transport::new(&plane, &plane, &angular, &identity, &identity, &identity, &identity)
            .unwrap();

    let src: Vec<f64> = (0..plane.len()).map(|i| i as f64).collect();
    let mut before = vec![0f64; plane.len()];
    let mut tmp = vec![0f64; transport.tmp_size()];
    transport.forw_view(0, &src, &mut before, &mut tmp).unwrap();

    transport.resetup().unwrap();

    let mut after = vec![0f64; plane.len()];
    transport.forw_view(0, &src, &mut after, &mut tmp).unwrap();
    assert_eq!(before, after);
}

#[test]
fn degenerate_optics_are_rejected_at_setup() {
    let plane = PlaneGeometry::new(4, 4, 0.1, 0.1);
    let degenerate = Optics1D {
        pp: 1.,
        pa: 1.,
        ap: 1.,
        aa: 1.,
        cp: 0.,
        ca: 0.,
    };
    let identity = Optics1D::identity();
    let angular = two_view_angular(AngularBasis::Dirac);
    let err = Transport::new(&plane, &plane, &angular, &identity, &identity, &degenerate, &identity)
        .unwrap_err();
    assert!(matches!(err, TransportError::DegenerateOptics(_)));
}

#[test]
fn out_of_range_view_index_is_a_programming_error() {
    let plane = PlaneGeometry::new(4, 4, 0.1, 0.1);
    let identity = Optics1D::identity();
    let angular = two_view_angular(AngularBasis::Dirac);
    let transport =
        Transport::new(&plane, &plane, &angular, &identity, &identity, &identity, &identity)
            .unwrap();
    let src = vec![0f64; plane.len()];
    let mut dst = vec![0f64; plane.len()];
    let mut tmp = vec![0f64; transport.tmp_size()];
    let err = transport.forw_view(99, &src, &mut dst, &mut tmp).unwrap_err();
    assert!(matches!(err, TransportError::ProgrammingError(_)));
}

#[test]
fn destroyed_transport_refuses_further_computation() {
    let plane = PlaneGeometry::new(4, 4, 0.1, 0.1);
    let identity = Optics1D::identity();
    let angular = two_view_angular(AngularBasis::Dirac);
    let mut transport =
        Transport::new(&plane, &plane, &angular, &identity, &identity, &identity, &identity)
            .unwrap();
    transport.destroy();
    let src = vec![0f64; plane.len()];
    let mut dst = vec![0f64; plane.len()];
    let mut tmp = vec![0f64; transport.tmp_size()];
    let err = transport.forw_view(0, &src, &mut dst, &mut tmp).unwrap_err();
    assert!(matches!(err, TransportError::InvariantViolation(_)));
}
