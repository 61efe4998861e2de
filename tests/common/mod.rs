//! On-disk solution fixtures shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct SolutionFixture {
    pub dir: TempDir,
    pub solution: PathBuf,
}

impl SolutionFixture {
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Solution with four projects:
///
/// - `Core` 1.0.0, packaged through a nuspec as `Company.Core`
/// - `Data` 2.3.0, references Core
/// - `App` 1.4.0, references Data, consumes `Vendor.Lib` and `Company.Core` as packages
/// - `Core.Tests`, references Core
/// - `Legacy`, classic project with AssemblyInfo.cs, references Core
pub fn sample_solution() -> SolutionFixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "Sample.sln",
        r#"
Microsoft Visual Studio Solution File, Format Version 12.00
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Core", "src\Core\Core.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Data", "src\Data\Data.csproj", "{22222222-2222-2222-2222-222222222222}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "App", "src\App\App.csproj", "{33333333-3333-3333-3333-333333333333}"
EndProject
Project("{9A19103F-16F7-4668-BE54-9A1E7A4F7556}") = "Core.Tests", "test\Core.Tests\Core.Tests.csproj", "{44444444-4444-4444-4444-444444444444}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Legacy", "src\Legacy\Legacy.csproj", "{55555555-5555-5555-5555-555555555555}"
EndProject
"#,
    );

    write(
        root,
        "src/Core/Core.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Version>1.0.0</Version>
  </PropertyGroup>
</Project>
"#,
    );
    write(
        root,
        "src/Core/Module.nuspec",
        r#"<?xml version="1.0" encoding="utf-8"?>
<package>
  <metadata>
    <id>Company.Core</id>
    <version>1.0.0</version>
  </metadata>
</package>
"#,
    );

    write(
        root,
        "src/Data/Data.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Version>2.3.0</Version>
  </PropertyGroup>
  <ItemGroup>
    <ProjectReference Include="..\Core\Core.csproj" />
  </ItemGroup>
</Project>
"#,
    );

    write(
        root,
        "src/App/App.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Version>1.4.0</Version>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Company.Core" Version="1.0.0" />
    <PackageReference Include="Vendor.Lib" Version="3.0.0" />
  </ItemGroup>
  <ItemGroup>
    <ProjectReference Include="..\Data\Data.csproj" />
  </ItemGroup>
</Project>
"#,
    );

    write(
        root,
        "test/Core.Tests/Core.Tests.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Version>1.0.0</Version>
  </PropertyGroup>
  <ItemGroup>
    <ProjectReference Include="..\..\src\Core\Core.csproj" />
  </ItemGroup>
</Project>
"#,
    );

    write(
        root,
        "src/Legacy/Legacy.csproj",
        r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <AssemblyName>Legacy</AssemblyName>
    <TargetFrameworkVersion>v4.8</TargetFrameworkVersion>
  </PropertyGroup>
  <ItemGroup>
    <Compile Include="Properties\AssemblyInfo.cs" />
  </ItemGroup>
  <ItemGroup>
    <ProjectReference Include="..\Core\Core.csproj" />
  </ItemGroup>
</Project>
"#,
    );
    write(
        root,
        "src/Legacy/Properties/AssemblyInfo.cs",
        r#"using System.Reflection;

[assembly: AssemblyTitle("Legacy")]
[assembly: AssemblyVersion("1.0.0.0")]
[assembly: AssemblyFileVersion("1.0.0.0")]
"#,
    );

    let solution = root.join("Sample.sln");
    SolutionFixture { dir, solution }
}
