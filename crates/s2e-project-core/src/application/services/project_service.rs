//! Project Service - main application orchestrator.
//!
//! This service runs the project creation workflow shared by all project
//! types:
//! 1. Inspect the target binary and pick a guest image
//! 2. Apply the project type's seed policy and validate the binary
//! 3. Resolve the project directory
//! 4. Let the project type populate the directory
//! 5. Record `project.json` and compose the user instructions
//!
//! Nothing is written to disk before step 4.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ImageCatalog, TemplateRenderer},
        project_types::{ProjectContext, ProjectType},
        services::ImageService,
    },
    domain::{
        Arch, BinaryFormat, DomainError, DomainValidator as validator, Environment, HEADER_LEN,
        ProjectLayout, Target,
    },
    error::{Context, ProjectResult},
};

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    /// Path to the binary under analysis.
    pub target: PathBuf,
    /// Project directory name; defaults to the target's file name.
    pub name: Option<String>,
    /// Guest image; defaults to the first image that runs the target.
    pub image: Option<String>,
    /// Seed-driven execution. Project types may override this.
    pub use_seeds: bool,
    /// Delete an existing project directory first.
    pub force: bool,
}

impl CreateRequest {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            name: None,
            image: None,
            use_seeds: false,
            force: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_seeds(mut self, use_seeds: bool) -> Self {
        self.use_seeds = use_seeds;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// A validated creation request, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPlan {
    pub project_type: &'static str,
    pub target: Target,
    pub layout: ProjectLayout,
    pub use_seeds: bool,
    /// An existing directory will be deleted (`force` was given).
    pub replaces_existing: bool,
}

/// Result of a successful creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project_type: &'static str,
    pub target: Target,
    pub layout: ProjectLayout,
    pub use_seeds: bool,
    pub instructions: String,
}

/// Contents of `project.json`.
#[derive(Debug, Serialize)]
struct ProjectDescriptor<'a> {
    project_type: &'a str,
    project_dir: &'a Path,
    target_path: &'a Path,
    target_arch: Arch,
    target_format: BinaryFormat,
    image: &'a str,
    os_name: &'a str,
    os_arch: Arch,
    binary_formats: &'a BTreeSet<String>,
    use_seeds: bool,
    seeds_dir: PathBuf,
    created_at: DateTime<Local>,
}

type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Main project creation service.
pub struct ProjectService {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    images: ImageService,
    environment: Environment,
    clock: Clock,
}

impl ProjectService {
    /// Create a new project service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
        images: Box<dyn ImageCatalog>,
        environment: Environment,
    ) -> Self {
        Self {
            filesystem,
            renderer,
            images: ImageService::new(images),
            environment,
            clock: Box::new(Local::now),
        }
    }

    /// Replace the wall clock used for `current_time` and `created_at`.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Validate a request without touching the disk.
    #[instrument(
        skip_all,
        fields(
            project_type = project_type.name(),
            target = %request.target.display()
        )
    )]
    pub fn plan(
        &self,
        project_type: &dyn ProjectType,
        request: &CreateRequest,
    ) -> ProjectResult<ProjectPlan> {
        let target = self.inspect_target(request)?;

        let policy = project_type.seed_policy();
        if policy.overrides(request.use_seeds) {
            warn!(
                project_type = project_type.name(),
                "Seeds are required for this project type; enabling them"
            );
        }
        let use_seeds = policy.resolve(request.use_seeds);

        project_type.validate_binary(&target)?;

        let name = request.name.clone().unwrap_or_else(|| target.basename());
        validator::validate_project_name(&name)?;

        let layout = ProjectLayout::new(self.environment.projects_dir().join(&name));
        let replaces_existing = self.filesystem.exists(layout.root());
        if replaces_existing && !request.force {
            return Err(ApplicationError::ProjectExists {
                path: layout.root().to_path_buf(),
            }
            .into());
        }

        Ok(ProjectPlan {
            project_type: project_type.name(),
            target,
            layout,
            use_seeds,
            replaces_existing,
        })
    }

    /// Create a project.
    ///
    /// If populating the directory fails, the directory is removed again
    /// (best effort) and the original error is returned.
    #[instrument(
        skip_all,
        fields(
            project_type = project_type.name(),
            target = %request.target.display()
        )
    )]
    pub fn create(
        &self,
        project_type: &dyn ProjectType,
        request: &CreateRequest,
    ) -> ProjectResult<ProjectSummary> {
        let plan = self.plan(project_type, request)?;
        let root = plan.layout.root();

        if plan.replaces_existing {
            warn!(path = %root.display(), "Removing existing project");
            self.filesystem.remove_dir_all(root)?;
        }

        self.filesystem
            .create_dir_all(&self.environment.projects_dir())?;
        self.filesystem.create_dir(root)?;
        info!(path = %root.display(), "Project directory created");

        match self.populate(project_type, &plan) {
            Ok(instructions) => {
                info!("Project created successfully");
                Ok(ProjectSummary {
                    project_type: plan.project_type,
                    target: plan.target,
                    layout: plan.layout,
                    use_seeds: plan.use_seeds,
                    instructions,
                })
            }
            Err(e) => {
                warn!(error = %e, "Project creation failed, attempting rollback");
                self.rollback(root);
                Err(e)
            }
        }
    }

    /// List the guest images of this environment.
    pub fn images(&self) -> &ImageService {
        &self.images
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Sniff the target's format and pair it with a guest image.
    fn inspect_target(&self, request: &CreateRequest) -> ProjectResult<Target> {
        let path = &request.target;

        if !self.filesystem.exists(path) {
            return Err(DomainError::TargetNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        if !self.filesystem.is_file(path) {
            return Err(DomainError::TargetNotAFile {
                path: path.display().to_string(),
            }
            .into());
        }

        let path = self.filesystem.canonicalize(path)?;
        let header = self.filesystem.read_header(&path, HEADER_LEN)?;
        let (format, arch) =
            BinaryFormat::detect(&header).ok_or_else(|| DomainError::UnrecognizedExecutable {
                path: path.display().to_string(),
            })?;

        let image = self.images.resolve(request.image.as_deref(), format)?;
        let arch = arch.unwrap_or(image.os.arch);

        info!(%format, %arch, image = %image.name, "Target inspected");
        Ok(Target::new(path, arch, format, image))
    }

    /// Run the project type's hooks against a freshly created directory.
    fn populate(&self, project_type: &dyn ProjectType, plan: &ProjectPlan) -> ProjectResult<String> {
        let created_at = (self.clock)();
        let ctx = ProjectContext::new(
            self.filesystem.as_ref(),
            self.renderer.as_ref(),
            &self.environment,
            &plan.target,
            &plan.layout,
            plan.use_seeds,
            created_at,
        );

        info!("Creating project directories");
        project_type.create_dirs(&ctx)?;

        info!("Rendering bootstrap script");
        project_type.create_bootstrap(&ctx)?;

        info!("Rendering configuration files");
        project_type.create_config(&ctx)?;

        self.write_descriptor(plan, created_at)?;

        Ok(project_type.create_instructions(&ctx).render())
    }

    fn write_descriptor(&self, plan: &ProjectPlan, created_at: DateTime<Local>) -> ProjectResult<()> {
        let target = &plan.target;
        let descriptor = ProjectDescriptor {
            project_type: plan.project_type,
            project_dir: plan.layout.root(),
            target_path: target.path(),
            target_arch: target.arch(),
            target_format: target.format(),
            image: &target.image().name,
            os_name: &target.os().name,
            os_arch: target.os().arch,
            binary_formats: &target.os().binary_formats,
            use_seeds: plan.use_seeds,
            seeds_dir: plan.layout.seeds_dir(),
            created_at,
        };

        let json = serde_json::to_string_pretty(&descriptor)
            .context("Failed to serialize project descriptor")?;
        self.filesystem
            .write_file(&plan.layout.descriptor(), &format!("{json}\n"))
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            let failure = ApplicationError::RollbackFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            };
            warn!(error = %failure, "Project directory left behind");
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use crate::application::ports::output::{
        MockFilesystem, MockImageCatalog, MockTemplateRenderer,
    };
    use crate::application::project_types::CgcProject;
    use crate::domain::{ImageDescriptor, OsInfo};
    use crate::error::ProjectError;

    const TARGET: &str = "/bins/CADET_00001";
    const ROOT: &str = "/env/projects/CADET_00001";
    const DECREE_HEADER: &[u8] = b"\x7fCGC\x01";

    fn catalog() -> MockImageCatalog {
        let mut catalog = MockImageCatalog::new();
        catalog.expect_get().returning(|name| match name {
            "cgc" => Ok(ImageDescriptor::new("cgc", OsInfo::new("cgc", Arch::I386, ["decree"]))),
            "linux" => Ok(ImageDescriptor::new(
                "linux",
                OsInfo::new("linux", Arch::X86_64, ["elf"]),
            )),
            other => Err(ApplicationError::ImageNotFound { name: other.into() }.into()),
        });
        catalog
    }

    /// Read-only expectations shared by every test.
    fn filesystem(header: &'static [u8], project_exists: bool) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(move |p| p == Path::new(TARGET) || (project_exists && p == Path::new(ROOT)));
        fs.expect_is_file().returning(|p| p == Path::new(TARGET));
        fs.expect_canonicalize().returning(|p| Ok(p.to_path_buf()));
        fs.expect_read_header()
            .returning(move |_, len| Ok(header[..len.min(header.len())].to_vec()));
        fs
    }

    fn service(fs: MockFilesystem, renderer: MockTemplateRenderer) -> ProjectService {
        ProjectService::new(
            Box::new(fs),
            Box::new(renderer),
            Box::new(catalog()),
            Environment::new("/env"),
        )
        .with_clock(|| Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap())
    }

    fn expect_no_mutation(fs: &mut MockFilesystem) {
        fs.expect_create_dir().never();
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();
        fs.expect_symlink().never();
        fs.expect_set_permissions().never();
        fs.expect_remove_dir_all().never();
    }

    fn expect_full_creation(fs: &mut MockFilesystem) {
        fs.expect_create_dir_all().times(1).returning(|_| Ok(()));
        fs.expect_create_dir().times(2).returning(|_| Ok(()));
        fs.expect_symlink().times(1).returning(|_, _| Ok(()));
        // bootstrap.sh, three config files, project.json
        fs.expect_write_file().times(5).returning(|_, _| Ok(()));
        fs.expect_set_permissions().times(1).returning(|_, _| Ok(()));
    }

    fn renderer() -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|name, _| Ok(format!("rendered {name}\n")));
        renderer
    }

    #[test]
    fn elf_only_image_fails_before_any_mutation() {
        let mut fs = filesystem(DECREE_HEADER, false);
        expect_no_mutation(&mut fs);
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().never();

        let request = CreateRequest::new(TARGET).with_image("linux");
        let err = service(fs, renderer)
            .create(&CgcProject, &request)
            .unwrap_err();

        assert!(matches!(err, ProjectError::Configuration { .. }));
        assert!(err.to_string().contains("CGC image"));
    }

    #[test]
    fn decree_image_creates_project_with_seeds_forced() {
        let mut fs = filesystem(DECREE_HEADER, false);
        expect_full_creation(&mut fs);

        let request = CreateRequest::new(TARGET).with_image("cgc").with_seeds(false);
        let summary = service(fs, renderer())
            .create(&CgcProject, &request)
            .unwrap();

        assert!(summary.use_seeds);
        assert_eq!(summary.project_type, "cgc");
        assert_eq!(summary.layout.root(), Path::new(ROOT));
        assert_eq!(summary.target.arch(), Arch::I386);
        assert!(summary.instructions.contains("<index>-<priority>.pov"));
        assert!(summary.instructions.contains(&format!("{ROOT}/seeds")));
    }

    #[test]
    fn descriptor_records_target_and_image() {
        let mut fs = filesystem(DECREE_HEADER, false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_dir().returning(|_| Ok(()));
        fs.expect_symlink().returning(|_, _| Ok(()));
        fs.expect_set_permissions().returning(|_, _| Ok(()));
        fs.expect_write_file()
            .withf(|p, _| !p.ends_with("project.json"))
            .returning(|_, _| Ok(()));
        fs.expect_write_file()
            .withf(|p, content| {
                p.ends_with("project.json")
                    && content.contains("\"project_type\": \"cgc\"")
                    && content.contains("\"image\": \"cgc\"")
                    && content.contains("\"use_seeds\": true")
                    && content.contains("\"target_format\": \"decree\"")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let request = CreateRequest::new(TARGET).with_image("cgc");
        service(fs, renderer()).create(&CgcProject, &request).unwrap();
    }

    #[test]
    fn image_is_selected_automatically_when_omitted() {
        let mut catalog = MockImageCatalog::new();
        catalog.expect_list().returning(|| {
            Ok(vec![
                ImageDescriptor::new("a-linux", OsInfo::new("linux", Arch::X86_64, ["elf"])),
                ImageDescriptor::new("b-cgc", OsInfo::new("cgc", Arch::I386, ["decree"])),
            ])
        });
        let mut fs = filesystem(DECREE_HEADER, false);
        expect_no_mutation(&mut fs);

        let service = ProjectService::new(
            Box::new(fs),
            Box::new(MockTemplateRenderer::new()),
            Box::new(catalog),
            Environment::new("/env"),
        );
        let plan = service.plan(&CgcProject, &CreateRequest::new(TARGET)).unwrap();

        assert_eq!(plan.target.image().name, "b-cgc");
        assert!(plan.use_seeds);
        assert!(!plan.replaces_existing);
    }

    #[test]
    fn existing_project_is_not_overwritten() {
        let mut fs = filesystem(DECREE_HEADER, true);
        expect_no_mutation(&mut fs);

        let request = CreateRequest::new(TARGET).with_image("cgc");
        let err = service(fs, MockTemplateRenderer::new())
            .create(&CgcProject, &request)
            .unwrap_err();

        assert!(matches!(
            err,
            ProjectError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn force_removes_existing_project_first() {
        let mut fs = filesystem(DECREE_HEADER, true);
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new(ROOT))
            .times(1)
            .returning(|_| Ok(()));
        expect_full_creation(&mut fs);

        let request = CreateRequest::new(TARGET).with_image("cgc").with_force(true);
        assert!(service(fs, renderer()).create(&CgcProject, &request).is_ok());
    }

    #[test]
    fn failure_while_populating_rolls_back() {
        let mut fs = filesystem(DECREE_HEADER, false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_dir().returning(|_| Ok(()));
        fs.expect_symlink().returning(|_, _| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_set_permissions().returning(|_, _| Ok(()));
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new(ROOT))
            .times(1)
            .returning(|_| Ok(()));

        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().returning(|name, _| {
            if name == "models.lua" {
                Err(ApplicationError::TemplateNotFound { name: name.into() }.into())
            } else {
                Ok(String::new())
            }
        });

        let request = CreateRequest::new(TARGET).with_image("cgc");
        let err = service(fs, renderer).create(&CgcProject, &request).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn missing_target_is_reported() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        expect_no_mutation(&mut fs);

        let err = service(fs, MockTemplateRenderer::new())
            .create(&CgcProject, &CreateRequest::new("/nope"))
            .unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Domain(DomainError::TargetNotFound { .. })
        ));
    }

    #[test]
    fn script_target_is_unrecognized() {
        let mut fs = filesystem(b"#!/bin/sh\n", false);
        expect_no_mutation(&mut fs);

        let err = service(fs, MockTemplateRenderer::new())
            .create(&CgcProject, &CreateRequest::new(TARGET).with_image("cgc"))
            .unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Domain(DomainError::UnrecognizedExecutable { .. })
        ));
    }

    #[test]
    fn invalid_project_name_is_rejected() {
        let mut fs = filesystem(DECREE_HEADER, false);
        expect_no_mutation(&mut fs);

        let request = CreateRequest::new(TARGET).with_image("cgc").with_name("../escape");
        let err = service(fs, MockTemplateRenderer::new())
            .plan(&CgcProject, &request)
            .unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Domain(DomainError::InvalidProjectName { .. })
        ));
    }
}
