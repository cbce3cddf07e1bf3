//! Command-line driver for a two-plane light-field transport.
//!
//! Builds a toy source-to-destination system (free-space propagation by a
//! configurable distance), runs the forward view for every configured
//! angular sample, and reports the adjoint residual
//! `<forw(u), v> - <u, back(v)>` as a sanity check on the built transport.

use clap::Parser;
use lightfield_transport::{
    AngularBasis, AngularPlane, Optics1D, Parameterisation, PlaneGeometry, Transport,
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Samples per axis on the source and destination planes.
    #[arg(long, default_value_t = 16)]
    n: usize,

    /// Sample pitch in plane units.
    #[arg(long, default_value_t = 0.1)]
    pitch: f64,

    /// Free-space propagation distance between source and destination.
    #[arg(long, default_value_t = 1.0)]
    distance: f64,

    /// Number of angular samples, evenly spaced in `[-0.5, 0.5]`.
    #[arg(long, default_value_t = 4)]
    views: usize,
}

fn main() -> lightfield_transport::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let src_plane = PlaneGeometry::new(args.n, args.n, args.pitch, args.pitch);
    let dst_plane = src_plane;
    let identity = Optics1D::identity();
    let propagation = Optics1D::translation(args.distance);

    let mut angular = AngularPlane::default();
    let step = if args.views > 1 {
        1.0 / (args.views - 1) as f64
    } else {
        0.
    };
    let u: Vec<f64> = (0..args.views).map(|i| -0.5 + i as f64 * step).collect();
    let v = u.clone();
    let w = vec![1.0 / args.views as f64; args.views];
    angular.setup(
        args.pitch / 2.,
        args.pitch / 2.,
        AngularBasis::Dirac,
        Parameterisation::Spatial,
        &u,
        &v,
        &w,
    )?;

    let transport = Transport::new(
        &src_plane,
        &dst_plane,
        &angular,
        &identity,
        &identity,
        &propagation,
        &propagation,
    )?;

    info!(
        "configured transport: {} views, {}x{} samples per plane",
        angular.num_points(),
        src_plane.ns,
        src_plane.nt
    );

    let src: Vec<f64> = (0..src_plane.len())
        .map(|i| (i as f64 * 0.37).sin())
        .collect();
    let probe: Vec<f64> = (0..dst_plane.len())
        .map(|i| (i as f64 * 0.53).cos())
        .collect();
    let mut tmp = vec![0f64; transport.tmp_size()];

    for view in 0..angular.num_points() {
        let mut forward = vec![0f64; dst_plane.len()];
        transport.forw_view(view, &src, &mut forward, &mut tmp)?;

        let mut backward = vec![0f64; src_plane.len()];
        transport.back_view(view, &probe, &mut backward, &mut tmp)?;

        let lhs: f64 = forward.iter().zip(probe.iter()).map(|(a, b)| a * b).sum();
        let rhs: f64 = src.iter().zip(backward.iter()).map(|(a, b)| a * b).sum();
        println!(
            "view {view}: <forw(u), v> = {lhs:.6}, <u, back(v)> = {rhs:.6}, residual = {:.3e}",
            (lhs - rhs).abs()
        );
    }

    Ok(())
}
