//! GLSL ES 3.00 sources for the three demos.

pub const FLAT_2D_VERT: &str = r#"#version 300 es
layout(location = 0) in vec2 a_position;
uniform vec2 u_offset;

void main() {
    gl_Position = vec4(a_position + u_offset, 0.0, 1.0);
    gl_PointSize = 10.0;
}
"#;

pub const FLAT_2D_FRAG: &str = r#"#version 300 es
precision highp float;
uniform vec4 u_color;
out vec4 fragColor;

void main() {
    fragColor = u_color;
}
"#;

const LIGHTING_STRUCTS: &str = r#"
struct Material {
    vec3 diffuse;
    vec3 specular;
    float shininess;
};

struct Light {
    vec3 position;
    vec3 ambient;
    vec3 diffuse;
    vec3 specular;
};

uniform Material material;
uniform Light light;
uniform vec3 u_viewPos;

vec3 phong(vec3 fragPos, vec3 normal) {
    vec3 norm = length(normal) > 0.0 ? normalize(normal) : normal;
    vec3 lightDir = normalize(light.position - fragPos);
    vec3 viewDir = normalize(u_viewPos - fragPos);

    vec3 ambient = light.ambient * material.diffuse;
    float diff = max(dot(norm, lightDir), 0.0);
    vec3 diffuse = light.diffuse * diff * material.diffuse;

    float spec = 0.0;
    if (diff > 0.0) {
        vec3 reflectDir = reflect(-lightDir, norm);
        spec = pow(max(dot(viewDir, reflectDir), 0.0), material.shininess);
    }
    vec3 specular = light.specular * spec * material.specular;
    return ambient + diffuse + specular;
}
"#;

const LIT_ATTRIBUTES: &str = r#"
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec4 a_color;
layout(location = 3) in vec2 a_texCoord;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
"#;

/// Per-fragment lighting
pub fn phong_sources() -> (String, String) {
    let vert = format!(
        "#version 300 es\n{}\nout vec3 v_fragPos;\nout vec3 v_normal;\n\
         void main() {{\n\
             v_fragPos = vec3(u_model * vec4(a_position, 1.0));\n\
             v_normal = mat3(transpose(inverse(u_model))) * a_normal;\n\
             gl_Position = u_projection * u_view * vec4(v_fragPos, 1.0);\n\
         }}\n",
        LIT_ATTRIBUTES
    );
    let frag = format!(
        "#version 300 es\nprecision highp float;\n{}\nin vec3 v_fragPos;\nin vec3 v_normal;\nout vec4 fragColor;\n\
         void main() {{\n\
             fragColor = vec4(phong(v_fragPos, v_normal), 1.0);\n\
         }}\n",
        LIGHTING_STRUCTS
    );
    (vert, frag)
}

/// Per-vertex lighting, interpolated across each triangle
pub fn gouraud_sources() -> (String, String) {
    let vert = format!(
        "#version 300 es\nprecision highp float;\n{}\n{}\nout vec3 v_color;\n\
         void main() {{\n\
             vec3 fragPos = vec3(u_model * vec4(a_position, 1.0));\n\
             vec3 normal = mat3(transpose(inverse(u_model))) * a_normal;\n\
             v_color = phong(fragPos, normal);\n\
             gl_Position = u_projection * u_view * vec4(fragPos, 1.0);\n\
         }}\n",
        LIT_ATTRIBUTES, LIGHTING_STRUCTS
    );
    let frag = "#version 300 es\nprecision highp float;\nin vec3 v_color;\nout vec4 fragColor;\n\
                void main() {\n\
                    fragColor = vec4(v_color, 1.0);\n\
                }\n"
        .to_string();
    (vert, frag)
}
