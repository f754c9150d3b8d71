/// WGSL shader for the tower meshes: instanced models with a simple
/// ambient + key light model and an additive emissive term.
pub const SCENE_SHADER: &str = r#"
struct FrameUniforms {
    view_proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    ambient: vec4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) emissive: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.emissive = instance.emissive.rgb * instance.emissive.a;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(frame.light_dir.xyz);
    let diffuse = max(dot(in.world_normal, light_dir), 0.0) * frame.light_dir.w;
    let lighting = frame.ambient.x + diffuse;
    let lit = in.color.rgb * lighting + in.emissive;
    return vec4<f32>(lit, in.color.a);
}
"#;

/// WGSL shader for the starfield: camera-facing quads, one instance per star.
pub const STAR_SHADER: &str = r#"
struct FrameUniforms {
    view_proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    ambient: vec4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

struct StarUniforms {
    // x = point size, y = opacity
    params: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> star: StarUniforms;

struct CornerInput {
    @location(0) corner: vec2<f32>,
};

struct StarInstance {
    @location(1) center: vec3<f32>,
};

struct StarOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_star(vertex: CornerInput, instance: StarInstance) -> StarOutput {
    let size = star.params.x;
    let offset = frame.camera_right.xyz * (vertex.corner.x * size)
        + frame.camera_up.xyz * (vertex.corner.y * size);
    var out: StarOutput;
    out.clip_position = frame.view_proj * vec4<f32>(instance.center + offset, 1.0);
    return out;
}

@fragment
fn fs_star(_in: StarOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, star.params.y);
}
"#;
