//! Viewer behaviour against a recording display and scripted keys

use image::RgbImage;
use lidarvis_algorithms::{compare, project, LabelColorTable, ProjectionParams};
use lidarvis_core::{LaserScan, Point3f, PointCloud, Result, Rgb, Transform3D, Vector3};
use lidarvis_visualization::{
    Action, Canvas, Display, KeyPress, KeySource, Navigator, Panel, PanelConfig, PanelKind,
    PanelLayout, ScanViewer, SceneView, Step, ViewMode,
};
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

#[derive(Default)]
struct RecordingDisplay {
    frames: Vec<usize>,
    points: Vec<(SceneView, Vec<[f32; 3]>, Vec<Rgb>)>,
    images: Vec<(Panel, (u32, u32))>,
    texts: Vec<(Canvas, String)>,
    closed: bool,
}

impl Display for RecordingDisplay {
    fn set_frame(&mut self, frame: usize) -> Result<()> {
        self.frames.push(frame);
        Ok(())
    }

    fn show_points(&mut self, view: SceneView, positions: &[[f32; 3]], colors: &[Rgb]) -> Result<()> {
        self.points.push((view, positions.to_vec(), colors.to_vec()));
        Ok(())
    }

    fn show_image(&mut self, panel: Panel, image: &RgbImage) -> Result<()> {
        self.images.push((panel, image.dimensions()));
        Ok(())
    }

    fn show_text(&mut self, canvas: Canvas, text: &str) -> Result<()> {
        self.texts.push((canvas, text.to_string()));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

struct ScriptedKeys(VecDeque<KeyPress>);

impl ScriptedKeys {
    fn new(keys: &[KeyPress]) -> Self {
        Self(keys.iter().copied().collect())
    }
}

impl KeySource for ScriptedKeys {
    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<KeyPress>> {
        Ok(self.0.pop_front())
    }
}

const LABEL_5: Rgb = [245, 150, 100];

fn table() -> LabelColorTable {
    LabelColorTable::new(BTreeMap::from([(5, LABEL_5), (10, [100, 150, 245])]))
}

fn params() -> ProjectionParams {
    ProjectionParams::new(3.0, -25.0, 64, 900).unwrap()
}

fn labeled_scan() -> LaserScan {
    let points = PointCloud::from_points(vec![
        Point3f::new(10.0, 0.0, 0.0),
        Point3f::new(0.0, 5.0, -1.0),
    ]);
    LaserScan::labeled(points, vec![5, 10]).unwrap()
}

fn viewer(
    keys: &[KeyPress],
    config: PanelConfig,
) -> ScanViewer<RecordingDisplay, ScriptedKeys> {
    let target = config.show_target.then_some((64, 900));
    ScanViewer::new(
        RecordingDisplay::default(),
        ScriptedKeys::new(keys),
        PanelLayout::from_config(&config),
        (64, 900),
        target,
        table(),
    )
}

fn poll(viewer: &mut ScanViewer<RecordingDisplay, ScriptedKeys>) -> Action {
    viewer.get_action(Duration::from_millis(1)).unwrap()
}

#[test]
fn test_next_next_back_session() {
    let keys = [KeyPress::Char('n'), KeyPress::Char('N'), KeyPress::Char('b')];
    let mut viewer = viewer(&keys, PanelConfig::default());
    let mut nav = Navigator::new(3, 10).unwrap();

    for _ in 0..keys.len() {
        let action = poll(&mut viewer);
        assert!(matches!(nav.apply(action), Step::Show(_)));
    }
    assert_eq!(nav.index(), 4);
    assert_eq!(poll(&mut viewer), Action::No);
}

#[test]
fn test_quit_key_ends_session() {
    let mut viewer = viewer(&[KeyPress::Char('x'), KeyPress::Escape], PanelConfig::default());
    let mut nav = Navigator::new(0, 2).unwrap();

    assert_eq!(nav.apply(poll(&mut viewer)), Step::Wait);
    assert_eq!(nav.apply(poll(&mut viewer)), Step::Stop);

    let display = viewer.destroy().unwrap();
    assert!(display.closed);
}

#[test]
fn test_pending_action_is_lossy() {
    let mut viewer = viewer(&[], PanelConfig::default());
    viewer.handle_key(KeyPress::Char('n'));
    viewer.handle_key(KeyPress::Char('b'));
    assert_eq!(poll(&mut viewer), Action::Back);
    assert_eq!(poll(&mut viewer), Action::No);
}

#[test]
fn test_mode_keys_change_point_colors() {
    let scan = labeled_scan();
    let projection = project(&scan, &params());
    let mut viewer = viewer(&[KeyPress::Char('2')], PanelConfig::default());

    viewer.set_source(&scan, &projection, None).unwrap();
    assert_eq!(viewer.display().points[0].2[0], LABEL_5);

    assert_eq!(poll(&mut viewer), Action::Change);
    assert_eq!(viewer.mode(), ViewMode::Range);
    viewer.set_source(&scan, &projection, None).unwrap();
    let colors = &viewer.display().points[1].2;
    assert_eq!(colors.len(), 2);
    assert_ne!(colors[0], LABEL_5);
}

#[test]
fn test_remission_mode_without_remissions_uses_ranges() {
    let scan = labeled_scan();
    let projection = project(&scan, &params());
    let mut viewer = viewer(&[], PanelConfig::default());

    viewer.set_mode(ViewMode::Range);
    viewer.set_source(&scan, &projection, None).unwrap();
    viewer.set_mode(ViewMode::Remission);
    viewer.set_source(&scan, &projection, None).unwrap();

    let points = &viewer.display().points;
    assert_eq!(points[0].2, points[1].2);
}

#[test]
fn test_unlabeled_scan_still_fills_label_panel() {
    let points = PointCloud::from_points(vec![Point3f::new(10.0, 0.0, 0.0)]);
    let scan = LaserScan::unlabeled(points);
    let projection = project(&scan, &params());
    let mut viewer = viewer(&[], PanelConfig::default());

    viewer.set_source(&scan, &projection, None).unwrap();
    let display = viewer.display();
    assert_eq!(
        display.images,
        vec![(Panel::new(Canvas::Source, PanelKind::Label), (900, 64))]
    );
    assert_eq!(display.texts[0].1, "900x64, 1 of 1 points projected");
}

#[test]
fn test_missing_remission_panel_is_skipped() {
    let scan = labeled_scan();
    let projection = project(&scan, &params());
    let config = PanelConfig {
        show_remissions: true,
        ..PanelConfig::default()
    };
    let mut viewer = viewer(&[], config);

    viewer.set_source(&scan, &projection, None).unwrap();
    assert_eq!(viewer.display().images.len(), 1);
}

#[test]
fn test_pose_moves_points() {
    let scan = labeled_scan();
    let projection = project(&scan, &params());
    let pose = Transform3D::translation(Vector3::new(1.0, 2.0, 3.0));
    let mut viewer = viewer(&[], PanelConfig::default());

    viewer.set_source(&scan, &projection, Some(&pose)).unwrap();
    assert_eq!(viewer.display().points[0].1[0], [11.0, 2.0, 3.0]);
}

#[test]
fn test_projection_size_is_checked() {
    let scan = labeled_scan();
    let small = ProjectionParams::new(3.0, -25.0, 32, 900).unwrap();
    let projection = project(&scan, &small);
    let mut viewer = viewer(&[], PanelConfig::default());

    assert!(viewer.set_source(&scan, &projection, None).is_err());
    assert!(viewer.set_target(&scan, &project(&scan, &params()), None).is_err());
}

#[test]
fn test_title_and_frame() {
    let mut viewer = viewer(&[], PanelConfig::default());
    viewer.set_frame(3, 10).unwrap();
    viewer.set_title().unwrap();

    let display = viewer.display();
    assert_eq!(display.frames, vec![3]);
    assert_eq!(display.texts, vec![(Canvas::Scene, "Frame 4 of 10".to_string())]);
}

#[test]
fn test_identical_target_diff_summary() {
    let scan = labeled_scan();
    let projection = project(&scan, &params());
    let config = PanelConfig {
        show_range: true,
        show_target: true,
        show_diff: true,
        ..PanelConfig::default()
    };
    let mut viewer = viewer(&[], config);

    viewer.set_source(&scan, &projection, None).unwrap();
    viewer.set_target(&scan, &projection, None).unwrap();
    let diff = compare(&projection, &projection, &table()).unwrap();
    viewer.set_diff(&diff).unwrap();

    let display = viewer.display();
    assert_eq!(display.points.len(), 2);
    assert_eq!(display.images.len(), 6);
    let (canvas, text) = display.texts.last().unwrap();
    assert_eq!(*canvas, Canvas::Diff);
    assert!(text.starts_with("IoU 100.00%, Acc 100.00%"), "{}", text);
}
