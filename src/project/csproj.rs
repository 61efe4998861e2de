//! `.csproj` reading and package-reference rewriting
//!
//! Both SDK-style projects (`<TargetFramework>`) and classic .NET Framework
//! projects (`<TargetFrameworkVersion>` plus an `AssemblyInfo.cs`) are read.

use crate::boundary::BoundaryWarning;
use crate::config::ConventionsConfig;
use crate::domain::{ModuleRecord, ModuleRefInfo, ProjectMetadata, SemanticVersion};
use crate::error::{CascadeError, Result};
use crate::project::{assembly_info, markup, nuspec, path_key, resolve_path};
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// A `<PackageReference>` as written in the project
#[derive(Debug, Clone, PartialEq)]
pub struct PackageReferenceEntry {
    pub id: String,
    pub version: Option<String>,
}

fn package_reference_regex() -> Result<Regex> {
    Regex::new(r"(?s)<PackageReference\b([^>]*?)(/>|>(.*?)</PackageReference\s*>)")
        .map_err(|e| CascadeError::project(format!("Invalid package reference pattern: {}", e)))
}

fn tag_regex(name: &str) -> Result<Regex> {
    Regex::new(&format!(r"<{}\b[^>]*>", regex::escape(name)))
        .map_err(|e| CascadeError::project(format!("Invalid {} pattern: {}", name, e)))
}

fn parse_version(raw: &str, context: &Path) -> Result<SemanticVersion> {
    SemanticVersion::parse(raw).map_err(|e| match e {
        CascadeError::Format(msg) => {
            CascadeError::format(format!("{} ({})", msg, context.display()))
        }
        other => other,
    })
}

/// Package references in document order; the version comes from the
/// `Version` attribute or a nested `<Version>` element
pub fn package_references(text: &str) -> Result<Vec<PackageReferenceEntry>> {
    let re = package_reference_regex()?;
    let entries = re
        .captures_iter(text)
        .filter_map(|caps| {
            let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let id = markup::attribute(attrs, "Include")?;
            let version = markup::attribute(attrs, "Version").or_else(|| {
                caps.get(3)
                    .and_then(|body| markup::element_text(body.as_str(), "Version"))
            });
            Some(PackageReferenceEntry { id, version })
        })
        .collect();
    Ok(entries)
}

/// `Include` values of every `<ProjectReference>`
pub fn project_references(text: &str) -> Result<Vec<String>> {
    let re = tag_regex("ProjectReference")?;
    let includes = re
        .find_iter(text)
        .filter_map(|m| markup::attribute(m.as_str(), "Include"))
        .collect();
    Ok(includes)
}

/// `Include` of the first `<Compile>` item ending with `AssemblyInfo.cs`
pub fn assembly_info_include(text: &str) -> Result<Option<String>> {
    let re = tag_regex("Compile")?;
    let found = re
        .find_iter(text)
        .filter_map(|m| markup::attribute(m.as_str(), "Include"))
        .find(|include| include.ends_with("AssemblyInfo.cs"));
    Ok(found)
}

/// Replace the versions of package references for which `new_version`
/// returns a value
pub fn rewrite_package_references<F>(text: &str, new_version: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = package_reference_regex()?;
    let rewritten = re.replace_all(text, |caps: &Captures| {
        let whole = caps[0].to_string();
        let attrs = &caps[1];
        let rest = &caps[2];

        let Some(version) = markup::attribute(attrs, "Include").and_then(|id| new_version(&id))
        else {
            return whole;
        };

        if let Some(attrs) = markup::set_attribute(attrs, "Version", &version) {
            return format!("<PackageReference{}{}", attrs, rest);
        }
        match markup::set_element_text(rest, "Version", &version) {
            Some(rest) => format!("<PackageReference{}{}", attrs, rest),
            None => whole,
        }
    });
    Ok(rewritten.into_owned())
}

/// Read one project into a module record
///
/// Identity comes from `<AssemblyName>` (or the file stem) and `<Version>`
/// (or `AssemblyVersion` for classic projects), both overridden by a sibling
/// nuspec when there is one. Package references without a version get the
/// configured default and a warning.
pub fn read_project(
    path: &Path,
    conventions: &ConventionsConfig,
) -> Result<(ModuleRecord, Vec<BoundaryWarning>)> {
    let path = resolve_path(Path::new(""), &path.to_string_lossy());
    let text = fs::read_to_string(&path).map_err(|e| {
        CascadeError::project(format!("Cannot read project '{}': {}", path.display(), e))
    })?;
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut warnings = Vec::new();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let is_test_module = conventions
        .test_project_suffixes
        .iter()
        .any(|suffix| file_name.ends_with(suffix.as_str()));

    let mut id = markup::property_text(&text, "AssemblyName").unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let declared_version = markup::property_text(&text, "Version")
        .map(|raw| parse_version(&raw, &path))
        .transpose()?;

    let mut metadata = ProjectMetadata::default();
    let sdk_framework = markup::property_text(&text, "TargetFramework")
        .or_else(|| markup::property_text(&text, "TargetFrameworks"));
    if let Some(framework) = sdk_framework {
        metadata.framework = Some(framework);
        metadata.assembly_version = markup::property_text(&text, "AssemblyVersion")
            .and_then(|raw| SemanticVersion::parse(&raw).ok());
        metadata.file_version = markup::property_text(&text, "FileVersion")
            .and_then(|raw| SemanticVersion::parse(&raw).ok())
            .or_else(|| declared_version.clone());
    } else if let Some(framework_version) = markup::property_text(&text, "TargetFrameworkVersion")
    {
        metadata.framework = Some(format!("netframework{}", framework_version));
        match assembly_info_include(&text)? {
            Some(include) => {
                let info_path = resolve_path(&dir, &include);
                let info_text = fs::read_to_string(&info_path).map_err(|e| {
                    CascadeError::project(format!(
                        "Cannot read '{}': {}",
                        info_path.display(),
                        e
                    ))
                })?;
                let (assembly_version, file_version) = assembly_info::read_versions(&info_text);
                metadata.assembly_version = assembly_version;
                metadata.file_version = file_version;
                metadata.assembly_info_path = Some(info_path);
            }
            None => warnings.push(BoundaryWarning::MissingAssemblyInfo {
                project: path_key(&path),
            }),
        }
    }

    // Classic projects usually carry their version only in AssemblyInfo.cs
    let mut version = match declared_version {
        Some(version) => version,
        None => match &metadata.assembly_version {
            Some(assembly_version) if metadata.assembly_info_path.is_some() => {
                assembly_version.clone()
            }
            _ => parse_version(&conventions.default_module_version, &path)?,
        },
    };

    let mut package_refs = Vec::new();
    for entry in package_references(&text)? {
        let raw = match entry.version {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                warnings.push(BoundaryWarning::MissingReferenceVersion {
                    project: id.clone(),
                    package: entry.id.clone(),
                    substituted: conventions.default_reference_version.clone(),
                });
                conventions.default_reference_version.clone()
            }
        };
        let version = parse_version(&raw, &path)?;
        package_refs.push(ModuleRefInfo::new(entry.id, Some(version)));
    }

    let module_references = project_references(&text)?
        .iter()
        .map(|include| path_key(&resolve_path(&dir, include)))
        .collect();

    let mut package_id = None;
    let nuspec_path = dir.join(&conventions.nuspec_file);
    if nuspec_path.exists() {
        let identity = nuspec::read_identity(&fs::read_to_string(&nuspec_path)?)?;
        id = identity.id.clone();
        version = identity.version;
        package_id = Some(identity.id);
    } else if markup::has_property(&text, "GeneratePackageOnBuild") {
        if markup::property_text(&text, "GeneratePackageOnBuild")
            .is_some_and(|flag| flag.eq_ignore_ascii_case("true"))
        {
            package_id = Some(markup::property_text(&text, "PackageId").unwrap_or_else(|| id.clone()));
        }
    } else {
        let info_path = dir.join(&conventions.package_info_file);
        if info_path.exists() {
            let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&info_path)?)?;
            package_id = value
                .get("package.id")
                .and_then(|v| v.as_str())
                .map(str::to_string);
        }
    }

    let record = ModuleRecord {
        info: ModuleRefInfo::new(id, Some(version)),
        path,
        package_references: package_refs,
        module_references,
        is_test_module,
        package_id,
        metadata,
    };
    Ok((record, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDK_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <AssemblyName>Company.App</AssemblyName>
    <Version>2.1.0</Version>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Company.Core" Version="1.0.0" />
    <PackageReference Include="Serilog">
      <Version>2.10.0</Version>
    </PackageReference>
    <PackageReference Include="Unversioned" />
  </ItemGroup>
  <ItemGroup>
    <ProjectReference Include="..\Data\Data.csproj" />
  </ItemGroup>
</Project>
"#;

    #[test]
    fn test_package_references() {
        let refs = package_references(SDK_PROJECT).unwrap();
        assert_eq!(
            refs,
            vec![
                PackageReferenceEntry {
                    id: "Company.Core".to_string(),
                    version: Some("1.0.0".to_string())
                },
                PackageReferenceEntry {
                    id: "Serilog".to_string(),
                    version: Some("2.10.0".to_string())
                },
                PackageReferenceEntry {
                    id: "Unversioned".to_string(),
                    version: None
                },
            ]
        );
    }

    #[test]
    fn test_project_references() {
        assert_eq!(
            project_references(SDK_PROJECT).unwrap(),
            vec![r"..\Data\Data.csproj".to_string()]
        );
    }

    #[test]
    fn test_assembly_info_include() {
        let text = r#"<ItemGroup>
    <Compile Include="Service.cs" />
    <Compile Include="Properties\AssemblyInfo.cs" />
</ItemGroup>"#;
        assert_eq!(
            assembly_info_include(text).unwrap().as_deref(),
            Some(r"Properties\AssemblyInfo.cs")
        );
        assert_eq!(assembly_info_include(SDK_PROJECT).unwrap(), None);
    }

    #[test]
    fn test_rewrite_attribute_and_element_versions() {
        let updated = rewrite_package_references(SDK_PROJECT, |id| match id {
            "Company.Core" => Some("1.1.0".to_string()),
            "Serilog" => Some("3.0.0".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(updated.contains(r#"<PackageReference Include="Company.Core" Version="1.1.0" />"#));
        assert!(updated.contains("<Version>3.0.0</Version>"));
        assert!(updated.contains(r#"<PackageReference Include="Unversioned" />"#));
        assert!(updated.contains("<Version>2.1.0</Version>"));
    }

    #[test]
    fn test_rewrite_without_matches_is_identity() {
        let updated = rewrite_package_references(SDK_PROJECT, |_| None).unwrap();
        assert_eq!(updated, SDK_PROJECT);
    }

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_sdk_project() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "App/App.csproj", SDK_PROJECT);

        let (record, warnings) = read_project(&path, &ConventionsConfig::default()).unwrap();

        assert_eq!(record.info.id, "Company.App");
        assert_eq!(record.info.version.as_ref().unwrap().to_string(), "2.1.0");
        assert_eq!(record.metadata.framework.as_deref(), Some("net8.0"));
        assert_eq!(record.package_references.len(), 3);
        assert_eq!(
            record.package_references[2].version.as_ref().unwrap().to_string(),
            "1.0.0"
        );
        assert_eq!(
            record.module_references,
            vec![path_key(&temp.path().join("Data/Data.csproj"))]
        );
        assert!(!record.is_test_module);
        assert_eq!(record.package_id, None);
        assert_eq!(
            warnings,
            vec![BoundaryWarning::MissingReferenceVersion {
                project: "Company.App".to_string(),
                package: "Unversioned".to_string(),
                substituted: "1.0.0".to_string(),
            }]
        );
    }

    #[test]
    fn test_read_ignores_nested_package_version() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            "App/App.csproj",
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Serilog">
      <Version>2.10.0</Version>
    </PackageReference>
  </ItemGroup>
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
</Project>
"#,
        );

        let (record, _) = read_project(&path, &ConventionsConfig::default()).unwrap();

        assert_eq!(record.info.version.unwrap().to_string(), "1.0.0");
        assert_eq!(
            record.package_references[0].version.as_ref().unwrap().to_string(),
            "2.10.0"
        );
    }

    #[test]
    fn test_read_version_property_after_package_pins() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            "App/App.csproj",
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Serilog"><Version>2.10.0</Version></PackageReference>
  </ItemGroup>
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Version>4.2.0</Version>
  </PropertyGroup>
</Project>
"#,
        );

        let (record, _) = read_project(&path, &ConventionsConfig::default()).unwrap();

        assert_eq!(record.info.version.unwrap().to_string(), "4.2.0");
        assert_eq!(record.metadata.file_version.unwrap().to_string(), "4.2.0");
    }

    #[test]
    fn test_read_test_project_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            "Core.Tests/Core.Tests.csproj",
            "<Project Sdk=\"Microsoft.NET.Sdk\">\n</Project>\n",
        );

        let (record, warnings) = read_project(&path, &ConventionsConfig::default()).unwrap();

        assert_eq!(record.info.id, "Core.Tests");
        assert_eq!(record.info.version.as_ref().unwrap().to_string(), "1.0.0");
        assert!(record.is_test_module);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_read_classic_project_with_assembly_info() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "Legacy/Properties/AssemblyInfo.cs",
            "[assembly: AssemblyVersion(\"1.0.2.0\")]\n[assembly: AssemblyFileVersion(\"1.0.2.0\")]\n",
        );
        let path = write(
            temp.path(),
            "Legacy/Legacy.csproj",
            r#"<Project ToolsVersion="15.0">
  <PropertyGroup>
    <TargetFrameworkVersion>v4.8</TargetFrameworkVersion>
  </PropertyGroup>
  <ItemGroup>
    <Compile Include="Properties\AssemblyInfo.cs" />
  </ItemGroup>
</Project>
"#,
        );

        let (record, warnings) = read_project(&path, &ConventionsConfig::default()).unwrap();

        assert_eq!(record.metadata.framework.as_deref(), Some("netframeworkv4.8"));
        assert_eq!(
            record.metadata.assembly_info_path,
            Some(temp.path().join("Legacy/Properties/AssemblyInfo.cs"))
        );
        assert_eq!(
            record.metadata.assembly_version.unwrap().to_string(),
            "1.0.2.0"
        );
        assert_eq!(record.info.version.unwrap().to_string(), "1.0.2.0");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_read_classic_project_without_assembly_info_warns() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            "Legacy/Legacy.csproj",
            "<Project>\n  <PropertyGroup>\n    <TargetFrameworkVersion>v4.8</TargetFrameworkVersion>\n  </PropertyGroup>\n</Project>\n",
        );

        let (_, warnings) = read_project(&path, &ConventionsConfig::default()).unwrap();

        assert!(matches!(
            warnings.as_slice(),
            [BoundaryWarning::MissingAssemblyInfo { .. }]
        ));
    }

    #[test]
    fn test_nuspec_overrides_identity() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "Data/Module.nuspec",
            "<package><metadata><id>Company.Data</id><version>1.4.0</version></metadata></package>",
        );
        let path = write(
            temp.path(),
            "Data/Data.csproj",
            "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <Version>0.9.0</Version>\n  </PropertyGroup>\n</Project>\n",
        );

        let (record, _) = read_project(&path, &ConventionsConfig::default()).unwrap();

        assert_eq!(record.info.id, "Company.Data");
        assert_eq!(record.info.version.unwrap().to_string(), "1.4.0");
        assert_eq!(record.package_id.as_deref(), Some("Company.Data"));
    }

    #[test]
    fn test_package_id_from_build_and_package_info() {
        let temp = tempfile::tempdir().unwrap();
        let packed = write(
            temp.path(),
            "Packed/Packed.csproj",
            "<Project>\n  <PropertyGroup>\n    <GeneratePackageOnBuild>true</GeneratePackageOnBuild>\n    <PackageId>Company.Packed</PackageId>\n  </PropertyGroup>\n</Project>\n",
        );
        write(
            temp.path(),
            "Info/Packageinfo.json",
            r#"{ "package.id": "Company.Info" }"#,
        );
        let info = write(temp.path(), "Info/Info.csproj", "<Project>\n</Project>\n");

        let conventions = ConventionsConfig::default();
        let (packed, _) = read_project(&packed, &conventions).unwrap();
        let (info, _) = read_project(&info, &conventions).unwrap();

        assert_eq!(packed.package_id.as_deref(), Some("Company.Packed"));
        assert_eq!(info.package_id.as_deref(), Some("Company.Info"));
    }

    #[test]
    fn test_unreadable_project_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let result = read_project(&temp.path().join("Missing.csproj"), &ConventionsConfig::default());
        assert!(matches!(result, Err(CascadeError::Project(_))));
    }
}
